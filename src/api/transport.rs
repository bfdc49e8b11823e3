//! HTTP plumbing: browser `fetch` on WASM, reqwest elsewhere.

use super::error::ApiError;

/// Verbs the client uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
	/// GET
	Get,
	/// PUT
	Put,
	/// DELETE
	Delete,
}

impl HttpMethod {
	/// Upper-case verb.
	pub fn as_str(&self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
		}
	}
}

/// One outgoing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
	/// Verb.
	pub method: HttpMethod,
	/// Full URL including the query string.
	pub url: String,
	/// JSON body, if any.
	pub body: Option<String>,
}

/// Status and raw body of a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response text.
	pub body: String,
}

impl HttpResponse {
	/// True for 2xx.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Sends requests. Timeouts and retries are left to the implementation.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
	/// Sends `request` and returns whatever the server answered.
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// The platform HTTP client.
#[derive(Clone, Debug, Default)]
pub struct FetchTransport;

#[cfg(target_arch = "wasm32")]
fn js_error(e: wasm_bindgen::JsValue) -> ApiError {
	ApiError::Transport(format!("{:?}", e))
}

#[cfg(target_arch = "wasm32")]
impl HttpTransport for FetchTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
		use wasm_bindgen::{JsCast, JsValue};
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{Request, RequestInit, RequestMode, Response};

		let opts = RequestInit::new();
		opts.set_method(request.method.as_str());
		opts.set_mode(RequestMode::Cors);
		if let Some(body) = &request.body {
			opts.set_body(&JsValue::from_str(body));
		}

		let req = Request::new_with_str_and_init(&request.url, &opts).map_err(js_error)?;
		if request.body.is_some() {
			req.headers()
				.set("Content-Type", "application/json")
				.map_err(js_error)?;
		}

		let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".into()))?;
		let value = JsFuture::from(window.fetch_with_request(&req))
			.await
			.map_err(js_error)?;
		let resp: Response = value
			.dyn_into()
			.map_err(|_| ApiError::Transport("response is not a Response".into()))?;

		let text = JsFuture::from(resp.text().map_err(js_error)?)
			.await
			.map_err(js_error)?;

		Ok(HttpResponse {
			status: resp.status(),
			body: text.as_string().unwrap_or_default(),
		})
	}
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpTransport for FetchTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
		let client = reqwest::Client::new();
		let builder = match request.method {
			HttpMethod::Get => client.get(&request.url),
			HttpMethod::Put => client.put(&request.url),
			HttpMethod::Delete => client.delete(&request.url),
		};
		let builder = match request.body {
			Some(body) => builder
				.header("Content-Type", "application/json")
				.body(body),
			None => builder,
		};

		let resp = builder
			.send()
			.await
			.map_err(|e| ApiError::Transport(e.to_string()))?;
		let status = resp.status().as_u16();
		let body = resp
			.text()
			.await
			.map_err(|e| ApiError::Transport(e.to_string()))?;
		Ok(HttpResponse { status, body })
	}
}
