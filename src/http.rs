//! Transport primitives for backend API calls.
//!
//! The module exposes [`ApiTransport`] as the gateway's only dependency on an HTTP stack,
//! alongside the [`Sleeper`] seam used by the activity poller so suspend-between-attempts
//! behavior stays injectable. Callers provide an implementation (typically behind
//! `Arc<T>` where `T: ApiTransport`) and every outbound request flows through it, so
//! swapping transports never touches auth, polling, or operation shaping.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, auth::TokenSecret, error::TransportError};

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;
/// Boxed future returned by [`Sleeper::sleep`].
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a + Send>>;

/// HTTP methods used by the backend surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
	/// HTTP PUT.
	Put,
	/// HTTP DELETE.
	Delete,
}
impl Method {
	/// Returns the canonical method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request payload variants accepted by [`ApiTransport`] implementations.
#[derive(Clone, Debug)]
pub enum RequestBody {
	/// JSON document sent with `application/json`.
	Json(serde_json::Value),
	/// Form fields sent with `application/x-www-form-urlencoded`.
	Form(Vec<(String, String)>),
}

/// A fully shaped outbound request.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Bearer credential attached as an `Authorization` header, when present.
	pub bearer: Option<TokenSecret>,
	/// Optional request payload.
	pub body: Option<RequestBody>,
}
impl ApiRequest {
	/// Creates a bodiless, unauthenticated request.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, bearer: None, body: None }
	}

	/// Attaches a bearer credential.
	pub fn with_bearer(mut self, bearer: TokenSecret) -> Self {
		self.bearer = Some(bearer);

		self
	}

	/// Attaches a JSON payload.
	pub fn with_json(mut self, body: serde_json::Value) -> Self {
		self.body = Some(RequestBody::Json(body));

		self
	}

	/// Attaches a form-encoded payload.
	pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
		self.body = Some(RequestBody::Form(fields));

		self
	}
}

/// A backend response reduced to the parts the gateway consumes.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx status codes.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the body as UTF-8 text, replacing invalid sequences.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON into `T`, reporting the failing path on mismatch.
	pub fn decode<T>(&self) -> Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		decode_json(&self.body)
	}
}

/// Decodes a JSON byte slice into `T` via `serde_path_to_error` so decode failures name
/// the offending field.
pub(crate) fn decode_json<T>(bytes: &[u8]) -> Result<T>
where
	T: serde::de::DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| Error::Decode { source })
}

/// Serializes a request payload into a JSON value.
pub(crate) fn encode_json<T>(value: &T) -> Result<serde_json::Value>
where
	T: Serialize,
{
	serde_json::to_value(value).map_err(|source| Error::Encode { source })
}

/// Abstraction over HTTP transports capable of executing backend API calls.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared across gateway
/// instances without additional wrappers, and the futures they return must be `Send` so
/// callers can box poll loops freely.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes one request and resolves with the reduced response.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse>;
}

/// Suspension seam used between poll attempts.
///
/// The production implementation delegates to the async runtime; tests inject
/// [`InstantSleeper`] so poll loops complete without wall-clock delays. Implementations
/// must not hold any lock across the returned future.
pub trait Sleeper
where
	Self: 'static + Send + Sync,
{
	/// Suspends the calling task for the provided duration.
	fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}

/// [`Sleeper`] that resolves immediately; used by tests and synchronous facades.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantSleeper;
impl Sleeper for InstantSleeper {
	fn sleep(&self, _: Duration) -> SleepFuture<'_> {
		Box::pin(async {})
	}
}

/// [`Sleeper`] backed by the tokio timer.
#[cfg(feature = "reqwest")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;
#[cfg(feature = "reqwest")]
impl Sleeper for TokioSleeper {
	fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
		let duration = std::time::Duration::try_from(duration).unwrap_or_default();

		Box::pin(tokio::time::sleep(duration))
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Backend calls should not follow redirects; configure any custom [`ReqwestClient`]
/// accordingly before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = match request.method {
				Method::Get => client.get(request.url),
				Method::Post => client.post(request.url),
				Method::Put => client.put(request.url),
				Method::Delete => client.delete(request.url),
			};

			if let Some(bearer) = &request.bearer {
				builder = builder.bearer_auth(bearer.expose());
			}

			builder = match &request.body {
				Some(RequestBody::Json(value)) => builder.json(value),
				Some(RequestBody::Form(fields)) => builder.form(fields),
				None => builder,
			};

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}
