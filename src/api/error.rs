use thiserror::Error;

use crate::graph::PayloadError;

/// The only message users see when a graph cannot be loaded.
pub const LOAD_FAILED: &str = "Failed to load relationship data";

/// Anything that can go wrong talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The request never produced a response.
	#[error("network error: {0}")]
	Transport(String),
	/// The backend answered with a non-2xx status.
	#[error("backend answered HTTP {0}")]
	Status(u16),
	/// The body was not the expected JSON.
	#[error("could not decode response: {0}")]
	Decode(#[from] serde_json::Error),
	/// The envelope said `success: false`.
	#[error("backend rejected the request: {0}")]
	Rejected(String),
	/// The envelope had no `data` where some was required.
	#[error("response carried no data")]
	MissingData,
	/// The graph broke a structural invariant.
	#[error("invalid graph payload: {0}")]
	InvalidPayload(#[from] PayloadError),
}
