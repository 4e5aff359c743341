//! Gateway-level error types shared across auth, polling, and entity operations.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential exchange rejected or unreachable.
	#[error("Credential exchange failed: {reason}.")]
	Authentication {
		/// Backend- or gateway-supplied reason string.
		reason: String,
		/// HTTP status code, when the rejection carried one.
		status: Option<u16>,
	},
	/// Non-2xx response from a backend call other than the credential exchange.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Synchronous/asynchronous expectation mismatch.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Name-to-identifier resolution failure.
	#[error(transparent)]
	NotFound(#[from] NotFoundError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Backend returned malformed JSON that could not be parsed.
	#[error("Backend returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Request payload could not be serialized.
	#[error("Request payload could not be serialized.")]
	Encode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl Error {
	/// Classifies the error into the coarse buckets external facades map onto their own
	/// failure representation.
	///
	/// This is the single place where heuristic classification lives. The backend does not
	/// attach a machine-readable code to every failure, so [`ApiError`] values without a
	/// recognizable HTTP status fall back to inspecting the extracted message text here and
	/// nowhere else.
	pub fn class(&self) -> ErrorClass {
		match self {
			Self::Authentication { .. } => ErrorClass::Auth,
			Self::NotFound(_) => ErrorClass::NotFound,
			Self::Transport(_) => ErrorClass::Timeout,
			Self::Api(api) => api.class(),
			Self::Protocol(_) | Self::Config(_) | Self::Decode { .. } | Self::Encode { .. } =>
				ErrorClass::Internal,
		}
	}
}

/// Coarse failure classes consumed by protocol handlers and route handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
	/// Authentication or authorization failure.
	Auth,
	/// Requested entity does not exist.
	NotFound,
	/// Network-level failure or bounded wait exhausted.
	Timeout,
	/// Backend throttled the caller.
	RateLimit,
	/// Anything else; treated as an internal failure.
	Internal,
}
impl ErrorClass {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorClass::Auth => "auth",
			ErrorClass::NotFound => "not_found",
			ErrorClass::Timeout => "timeout",
			ErrorClass::RateLimit => "rate_limit",
			ErrorClass::Internal => "internal",
		}
	}
}
impl Display for ErrorClass {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Structured non-2xx response captured from a backend call.
#[derive(Clone, Debug, ThisError)]
#[error("Backend call returned HTTP {status}: {}.", summary_of(.message, .reason, .code))]
pub struct ApiError {
	/// HTTP status code returned by the backend.
	pub status: u16,
	/// Raw response body as received.
	pub body: String,
	/// Backend error code extracted from the body, when present.
	pub code: Option<String>,
	/// Backend error message extracted from the body, when present.
	pub message: Option<String>,
	/// Backend failure reason extracted from the body, when present.
	pub reason: Option<String>,
}
impl ApiError {
	/// Captures a non-2xx response, extracting structured sub-fields from the body on a
	/// best-effort basis.
	pub fn from_response(status: u16, body: impl Into<String>) -> Self {
		let body = body.into();
		let parsed = serde_json::from_str::<ApiErrorBody>(&body).unwrap_or_default();

		Self {
			status,
			body,
			code: parsed.code,
			message: parsed.message.or(parsed.error),
			reason: parsed.reason,
		}
	}

	/// Returns the most descriptive extracted field, falling back to a generic label.
	pub fn summary(&self) -> &str {
		summary_of(&self.message, &self.reason, &self.code)
	}

	fn class(&self) -> ErrorClass {
		match self.status {
			401 | 403 => ErrorClass::Auth,
			404 => ErrorClass::NotFound,
			408 | 504 => ErrorClass::Timeout,
			429 => ErrorClass::RateLimit,
			_ => {
				let text = self.summary().to_ascii_lowercase();

				if text.contains("unauthorized") || text.contains("forbidden") {
					ErrorClass::Auth
				} else if text.contains("not found") {
					ErrorClass::NotFound
				} else if text.contains("timeout") || text.contains("timed out") {
					ErrorClass::Timeout
				} else if text.contains("rate limit") || text.contains("too many requests") {
					ErrorClass::RateLimit
				} else {
					ErrorClass::Internal
				}
			},
		}
	}
}

fn summary_of<'a>(
	message: &'a Option<String>,
	reason: &'a Option<String>,
	code: &'a Option<String>,
) -> &'a str {
	message
		.as_deref()
		.or(reason.as_deref())
		.or(code.as_deref())
		.unwrap_or("no further detail")
}

#[derive(Default, Deserialize)]
struct ApiErrorBody {
	code: Option<String>,
	message: Option<String>,
	reason: Option<String>,
	error: Option<String>,
}

/// Synchronous/asynchronous expectation mismatches.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProtocolError {
	/// An always-asynchronous operation responded without a tracking identifier.
	#[error("Backend response for {operation} is missing the expected tracking identifier.")]
	MissingTrackingId {
		/// Operation label for diagnostics.
		operation: &'static str,
	},
}

/// Name-to-identifier resolution failure carrying every known name to aid correction.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("No {kind} named `{name}` exists; available: {}.", .available.join(", "))]
pub struct NotFoundError {
	/// Entity kind label (venue, privilege group).
	pub kind: &'static str,
	/// The name that failed to resolve.
	pub name: String,
	/// Every name returned by the listing call.
	pub available: Vec<String>,
}

/// Configuration and validation failures raised by the gateway.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Backend descriptor contains an invalid URL.
	#[error("Descriptor contains an invalid URL.")]
	InvalidDescriptor {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A relative endpoint path could not be joined onto the descriptor base.
	#[error("Endpoint path `{path}` cannot be joined onto the descriptor base.")]
	InvalidEndpoint {
		/// The offending relative path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned a non-positive lifetime.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
