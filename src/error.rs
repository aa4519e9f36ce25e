//! Strategy-level error types shared across configuration, exchange, and verification.

// self
use crate::_prelude::*;

/// Strategy-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical strategy error exposed by public APIs.
///
/// Provider callbacks carrying an `error` are not represented here; they surface as
/// [`AuthOutcome::Fail`](crate::strategy::AuthOutcome::Fail).
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Provider rejected the authorization code.
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Verify callback reported an error.
	#[error("Verify callback failed.")]
	Verify {
		/// Error returned by the host's verify callback.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps a verify callback failure.
	pub fn verify(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Verify { source: Box::new(src) }
	}
}

/// Configuration and validation failures raised while constructing a strategy.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Raw options were not a JSON object.
	#[error("Strategy options must be an object.")]
	NotAnObject,
	/// Raw options contain a field of the wrong type.
	#[error("Strategy options are invalid.")]
	InvalidOptions {
		/// Parsing failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A required option is absent or empty.
	#[error("Strategy option `{field}` is required.")]
	MissingField {
		/// Wire name of the missing option.
		field: &'static str,
	},
	/// Telemetry descriptor could not be encoded or decoded.
	#[error("Telemetry header is invalid.")]
	Telemetry(#[source] serde_json::Error),
	/// Telemetry header is not valid base64.
	#[error("Telemetry header is not valid base64.")]
	TelemetryEncoding(#[from] base64::DecodeError),
	/// An endpoint URL cannot be parsed.
	#[error("The {endpoint} URL is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A custom header name or value cannot be sent over HTTP.
	#[error("Custom header `{name}` is invalid.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// Callback URL is relative and the request carries no origin to resolve it.
	#[error("Callback URL `{callback_url}` is relative and the request has no origin.")]
	RelativeCallback {
		/// Configured callback URL.
		callback_url: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Token endpoint returned an unexpected but non-fatal response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Provider- or strategy-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Userinfo endpoint answered with a non-success status.
	#[error("Userinfo endpoint returned an unexpected response: {message}.")]
	UserInfo {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Userinfo endpoint responded with something other than a JSON object.
	#[error("Userinfo endpoint returned malformed JSON.")]
	UserInfoParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
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
