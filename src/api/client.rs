use log::{debug, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::transport::{FetchTransport, HttpMethod, HttpRequest, HttpTransport};
use crate::graph::{GraphData, GraphQueryParams};

/// The `{success, data}` wrapper every endpoint answers with.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
	/// Whether the backend handled the request.
	pub success: bool,
	/// Payload, absent for some writes.
	pub data: Option<T>,
	/// Error or status text.
	#[serde(default)]
	pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
	/// Turns `success: false` into [`ApiError::Rejected`].
	pub fn into_result(self) -> Result<Option<T>, ApiError> {
		if self.success {
			Ok(self.data)
		} else {
			Err(ApiError::Rejected(
				self.message
					.unwrap_or_else(|| "request was not successful".into()),
			))
		}
	}
}

/// Method, path and query of one backend call, before the base URL is added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphRequest {
	/// Path below the API base, e.g. `/graph`.
	pub path: String,
	/// Query pairs in send order.
	pub query: Vec<(&'static str, String)>,
}

impl GraphRequest {
	/// Joins base, path and encoded query.
	pub fn url(&self, base_url: &str) -> String {
		let base = base_url.trim_end_matches('/');
		if self.query.is_empty() {
			return format!("{}{}", base, self.path);
		}
		let query = url::form_urlencoded::Serializer::new(String::new())
			.extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())))
			.finish();
		format!("{}{}?{}", base, self.path, query)
	}
}

/// Picks the endpoint for `params`: the scoped `/graph` form when a scope is
/// set, the unscoped mind map otherwise.
pub fn endpoint_for(params: &GraphQueryParams) -> GraphRequest {
	let path = if params.scope.is_some() {
		"/graph"
	} else {
		"/graph/mind-map"
	};
	GraphRequest {
		path: path.into(),
		query: params.to_query_pairs(),
	}
}

/// The tree-shaped variant behind the hierarchy page.
pub fn hierarchy_endpoint(params: &GraphQueryParams) -> GraphRequest {
	GraphRequest {
		path: "/graph/hierarchy".into(),
		query: params.to_query_pairs(),
	}
}

/// Percent-encodes `s` as a single path segment.
pub fn encode_segment(s: &str) -> String {
	// form encoding turns spaces into '+' and escapes a literal '+'
	url::form_urlencoded::byte_serialize(s.as_bytes())
		.collect::<String>()
		.replace('+', "%20")
}

fn annotation_path(node_id: &str) -> String {
	format!("/graph/annotations/{}", encode_segment(node_id))
}

/// Thin client over the campaign backend.
#[derive(Clone, Debug)]
pub struct ApiClient<T = FetchTransport> {
	base_url: String,
	transport: T,
}

impl ApiClient<FetchTransport> {
	/// Client using the platform transport.
	pub fn new(base_url: &str) -> Self {
		Self::with_transport(base_url, FetchTransport)
	}
}

impl<T: HttpTransport> ApiClient<T> {
	/// Client using a custom transport.
	pub fn with_transport(base_url: &str, transport: T) -> Self {
		Self {
			base_url: base_url.to_string(),
			transport,
		}
	}

	/// The transport requests go through.
	pub fn transport(&self) -> &T {
		&self.transport
	}

	async fn call<R: DeserializeOwned>(
		&self,
		method: HttpMethod,
		request: &GraphRequest,
		body: Option<String>,
	) -> Result<Option<R>, ApiError> {
		let url = request.url(&self.base_url);
		debug!("{} {}", method.as_str(), url);
		let resp = self
			.transport
			.send(HttpRequest { method, url, body })
			.await?;
		if !resp.is_success() {
			warn!("{} {} answered {}", method.as_str(), request.path, resp.status);
			return Err(ApiError::Status(resp.status));
		}
		let envelope: ApiEnvelope<R> = serde_json::from_str(&resp.body)?;
		envelope.into_result()
	}

	async fn fetch_graph(&self, request: GraphRequest) -> Result<GraphData, ApiError> {
		let data: GraphData = self
			.call(HttpMethod::Get, &request, None)
			.await?
			.ok_or(ApiError::MissingData)?;
		data.validate()?;
		debug!(
			"{} returned {} nodes, {} edges",
			request.path,
			data.nodes.len(),
			data.edges.len()
		);
		Ok(data)
	}

	/// Fetches the relationship graph for `params`.
	pub async fn graph(&self, params: &GraphQueryParams) -> Result<GraphData, ApiError> {
		self.fetch_graph(endpoint_for(params)).await
	}

	/// Fetches the hierarchy graph for `params`.
	pub async fn hierarchy(&self, params: &GraphQueryParams) -> Result<GraphData, ApiError> {
		self.fetch_graph(hierarchy_endpoint(params)).await
	}

	/// Stores the annotation of one node.
	pub async fn save_annotation(&self, node_id: &str, text: &str) -> Result<(), ApiError> {
		let request = GraphRequest {
			path: annotation_path(node_id),
			query: Vec::new(),
		};
		let body = serde_json::json!({ "annotation": text }).to_string();
		self.call::<serde_json::Value>(HttpMethod::Put, &request, Some(body))
			.await
			.map(|_| ())
	}

	/// Removes the annotation of one node.
	pub async fn delete_annotation(&self, node_id: &str) -> Result<(), ApiError> {
		let request = GraphRequest {
			path: annotation_path(node_id),
			query: Vec::new(),
		};
		self.call::<serde_json::Value>(HttpMethod::Delete, &request, None)
			.await
			.map(|_| ())
	}
}
