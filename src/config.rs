//! Build-time settings shared through Leptos context.

/// Base URL used when `CAMPAIGN_API_URL` is unset at build time.
pub const DEFAULT_API_BASE_URL: &str = "/api";

/// Application settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	/// Prefix for every backend path, without a trailing slash.
	pub api_base_url: String,
}

impl AppConfig {
	/// Reads `CAMPAIGN_API_URL` as captured at compile time.
	pub fn from_env() -> Self {
		Self::with_base_url(option_env!("CAMPAIGN_API_URL").unwrap_or(DEFAULT_API_BASE_URL))
	}

	/// Settings pointing at `base`.
	pub fn with_base_url(base: &str) -> Self {
		let trimmed = base.trim().trim_end_matches('/');
		Self {
			api_base_url: if trimmed.is_empty() {
				DEFAULT_API_BASE_URL.to_owned()
			} else {
				trimmed.to_owned()
			},
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self::from_env()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn trailing_slashes_are_dropped() {
		assert_eq!(
			AppConfig::with_base_url("https://campaigns.example/api/").api_base_url,
			"https://campaigns.example/api"
		);
	}

	#[test]
	fn blank_base_falls_back() {
		assert_eq!(AppConfig::with_base_url("  ").api_base_url, DEFAULT_API_BASE_URL);
	}
}
