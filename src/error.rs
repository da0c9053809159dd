//! Requester-level error types shared by the verbs, the credential exchange, and transports.

// self
use crate::_prelude::*;

/// Requester-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Status assumed for failures that never produced an HTTP response.
pub const DEFAULT_FAILURE_STATUS: u16 = 500;
/// Status carried by [`Error::RetryBudgetExhausted`].
pub const REJECTED_STATUS: u16 = 401;

/// Canonical requester error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (non-2xx status, DNS, TCP, TLS, body decoding).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The credential endpoint rejected the credentials or could not be reached.
	#[error("Authentication failed: {reason}.")]
	AuthenticationFailed {
		/// HTTP status returned by the credential endpoint, when available.
		status: Option<u16>,
		/// Transport- or endpoint-supplied reason string.
		reason: String,
	},
	/// The credential endpoint answered without a usable `access_token` field.
	#[error("Credential endpoint returned an unusable token response.")]
	TokenResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The call kept being rejected after every permitted re-authentication.
	#[error("Request failed: credentials rejected after {attempts} authentication attempt(s).")]
	RetryBudgetExhausted {
		/// Synthetic status of the terminal outcome (always 401).
		status: u16,
		/// Number of authentications spent on the call.
		attempts: u8,
	},
}
impl Error {
	/// Returns the HTTP status associated with the failure, if one is known.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Transport(err) => err.status(),
			Self::AuthenticationFailed { status, .. } => *status,
			Self::RetryBudgetExhausted { status, .. } => Some(*status),
			Self::Config(_) | Self::TokenResponse { .. } => None,
		}
	}

	/// Returns [`status`](Self::status), treating unknown statuses as server errors.
	pub fn effective_status(&self) -> u16 {
		self.status().unwrap_or(DEFAULT_FAILURE_STATUS)
	}

	/// Whether this failure is the synthetic "budget spent" outcome.
	pub fn is_budget_exhausted(&self) -> bool {
		matches!(self, Self::RetryBudgetExhausted { .. })
	}
}

/// Configuration and validation failures raised while building a requester.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A URL (credential endpoint or call target) could not be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending input.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header name or value cannot be sent over HTTP.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Failures surfaced by an [`HttpTransport`](crate::http::HttpTransport).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Server answered with a non-success status.
	#[error("Server responded with HTTP {status}: {message}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Canonical reason phrase or transport-supplied summary.
		message: String,
		/// Decoded response body, kept for callers that inspect error payloads.
		body: Value,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Response body could not be read.
	#[error("Response body could not be decoded.")]
	Decode {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Transport-specific decoding error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Builds a [`TransportError::Status`] with an empty body.
	pub fn status_only(status: u16, message: impl Into<String>) -> Self {
		Self::Status { status, message: message.into(), body: Value::Null }
	}

	/// Returns the HTTP status carried by the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			Self::Decode { status, .. } => *status,
			Self::Network { .. } => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
