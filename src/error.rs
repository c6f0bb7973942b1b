//! Crate-level error types shared across the gateway, descriptor, and vaults.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Vault-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::VaultError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Authentication failure surfaced to the caller.
	#[error(transparent)]
	Auth(#[from] AuthError),
}

/// Authentication failures raised while exchanging or re-checking credentials.
///
/// Every variant leaves the session fully cleared; `Rejected` carries the
/// human-readable message shown inline next to the login form.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Identity service rejected the submitted credentials.
	#[error("{message}")]
	Rejected {
		/// Service- or crate-supplied message suitable for inline display.
		message: String,
	},
	/// Identity service responded with malformed JSON that could not be parsed.
	#[error("Identity service returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Successful-looking login reply omitted the bearer token.
	#[error("Login response is missing a bearer token.")]
	MissingCredential,
	/// Successful-looking reply omitted the identity payload.
	#[error("Response is missing the identity payload.")]
	MissingIdentity,
	/// Identity payload carried a field the crate cannot interpret.
	#[error("Identity payload field `{field}` has an unsupported value.")]
	UnsupportedField {
		/// Name of the offending field.
		field: &'static str,
	},
	/// A logout cleared the session while this login was still in flight.
	#[error("Login was superseded by a logout issued while the call was in flight.")]
	Superseded,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Service descriptor could not be built.
	#[error(transparent)]
	Descriptor(#[from] crate::service::ServiceDescriptorError),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the identity service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the identity service.")]
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
