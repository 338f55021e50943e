//! Policy parsing errors.

use actgate_types::ErrorCode;
use thiserror::Error;

/// Error returned when a textual security policy is not one of the
/// supported spellings.
///
/// # Example
///
/// ```
/// use actgate_security::{PolicyParseError, SecurityPolicy};
/// use actgate_types::ErrorCode;
///
/// let err = "trust-me".parse::<SecurityPolicy>().unwrap_err();
/// assert_eq!(err.code(), "POLICY_UNKNOWN_LEVEL");
/// assert!(err.to_string().contains("trust-me"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyParseError {
    /// The input is not `only-trusted`, `non-malicious` or `all`.
    #[error("unknown security policy '{0}': expected only-trusted, non-malicious or all")]
    UnknownLevel(String),
}

impl ErrorCode for PolicyParseError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownLevel(_) => "POLICY_UNKNOWN_LEVEL",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
