// ── Core error types ──
//
// User-facing errors from espoir-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<espoir_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

use crate::storage::StorageError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Caller-supplied input rejected before any I/O.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Credentials rejected by the remote auth boundary.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Transport failure or non-2xx from the remote catalog/auth service.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The requested record does not exist.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Durable storage read/write failure that must be surfaced.
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from boundary-layer errors ───────────────────────────

impl From<espoir_api::Error> for CoreError {
    fn from(err: espoir_api::Error) -> Self {
        match err {
            espoir_api::Error::Authentication { message } => {
                CoreError::Authentication { message }
            }
            espoir_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Network {
                        message: "request timed out".into(),
                    }
                } else if e.is_connect() {
                    CoreError::Network {
                        message: format!("cannot reach service: {e}"),
                    }
                } else {
                    CoreError::Network {
                        message: e.to_string(),
                    }
                }
            }
            espoir_api::Error::NotFound { path } => CoreError::NotFound { resource: path },
            espoir_api::Error::Api { message, status } => CoreError::Network {
                message: format!("service error (HTTP {status}): {message}"),
            },
            espoir_api::Error::InvalidUrl(e) => {
                CoreError::Internal(format!("invalid URL: {e}"))
            }
            espoir_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Persistence {
            message: err.to_string(),
        }
    }
}
