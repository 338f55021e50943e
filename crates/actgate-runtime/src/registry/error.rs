//! Registry errors.
//!
//! These never reach the widget: a failed refresh is logged and the
//! previous snapshot stays authoritative.

use actgate_types::ErrorCode;
use thiserror::Error;

/// Failure to obtain a registry document.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The transport failed (DNS, TLS, timeout, connection reset).
    #[error("registry fetch failed: {0}")]
    Fetch(String),

    /// The endpoint answered with a non-success status.
    #[error("registry returned status {status}")]
    Status { status: u16 },

    /// The body was not a registry document.
    #[error("registry document malformed: {0}")]
    Malformed(String),
}

impl ErrorCode for RegistryError {
    fn code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "REGISTRY_FETCH_FAILED",
            Self::Status { .. } => "REGISTRY_BAD_STATUS",
            Self::Malformed(_) => "REGISTRY_MALFORMED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Every registry failure is retried on the next scheduled refresh.
        true
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else {
            Self::Fetch(err.to_string())
        }
    }
}
