//! Client for the campaign backend's graph endpoints.

mod client;
mod error;
mod transport;

pub use client::{ApiClient, ApiEnvelope, GraphRequest, encode_segment, endpoint_for, hierarchy_endpoint};
pub use error::{ApiError, LOAD_FAILED};
pub use transport::{FetchTransport, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
