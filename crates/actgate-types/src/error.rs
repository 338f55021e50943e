//! Unified error code interface for actgate.
//!
//! Every error enum in the workspace implements [`ErrorCode`] so that the
//! rendering layer and logs can branch on a stable machine-readable code
//! instead of on display strings.
//!
//! # Example
//!
//! ```
//! use actgate_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Timeout,
//!     Malformed(String),
//! }
//!
//! impl ErrorCode for FetchError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Timeout => "FETCH_TIMEOUT",
//!             Self::Malformed(_) => "FETCH_MALFORMED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! let err = FetchError::Timeout;
//! assert_eq!(err.code(), "FETCH_TIMEOUT");
//! assert!(err.is_recoverable());
//! ```

/// Machine-readable error classification.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**, e.g. `"REGISTRY_FETCH_FAILED"`
/// - **Prefixed by the owning area**: `REGISTRY_`, `RESOLVE_`, `ADAPTER_`,
///   `EXECUTE_`, `POLICY_`, `CONFIG_`
/// - **Stable**: codes are part of the public contract
///
/// # Recoverability
///
/// An error is recoverable when retrying later may succeed (network
/// hiccups, a registry endpoint that is temporarily down). Malformed
/// metadata or caller misuse is not recoverable.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows the workspace conventions.
///
/// # Panics
///
/// Panics if the code is empty, lacks `expected_prefix`, or is not
/// UPPER_SNAKE_CASE. Intended for tests.
///
/// # Example
///
/// ```
/// use actgate_types::{assert_error_code, ErrorCode};
///
/// struct Missing;
///
/// impl ErrorCode for Missing {
///     fn code(&self) -> &'static str { "RESOLVE_MISSING" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&Missing, "RESOLVE_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every variant in `errors` with [`assert_error_code`].
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum ProbeError {
        Unreachable,
        Rejected,
    }

    impl ErrorCode for ProbeError {
        fn code(&self) -> &'static str {
            match self {
                Self::Unreachable => "PROBE_UNREACHABLE",
                Self::Rejected => "PROBE_REJECTED",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Unreachable)
        }
    }

    #[test]
    fn codes_and_recoverability() {
        assert_eq!(ProbeError::Unreachable.code(), "PROBE_UNREACHABLE");
        assert!(ProbeError::Unreachable.is_recoverable());
        assert!(!ProbeError::Rejected.is_recoverable());
    }

    #[test]
    fn assert_error_codes_accepts_all_variants() {
        assert_error_codes(&[ProbeError::Unreachable, ProbeError::Rejected], "PROBE_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn assert_error_code_wrong_prefix() {
        assert_error_code(&ProbeError::Rejected, "REGISTRY_");
    }

    #[test]
    fn upper_snake_case_detection() {
        assert!(is_upper_snake_case("REGISTRY_FETCH_FAILED"));
        assert!(is_upper_snake_case("E2"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("registry"));
        assert!(!is_upper_snake_case("_LEADING"));
        assert!(!is_upper_snake_case("TRAILING_"));
        assert!(!is_upper_snake_case("DOUBLE__SEP"));
    }
}
