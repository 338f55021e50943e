//! Action errors.
//!
//! | Type | Raised by | Surfaced as |
//! |------|-----------|-------------|
//! | [`ResolveError`] | resolution / metadata validation | nothing rendered |
//! | [`ActionError`] | connect, post, sign, confirm | `error` status with the message |

use actgate_types::ErrorCode;
use thiserror::Error;

/// Message used when a failing step carries no text of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Unknown error";

/// A link could not be turned into an action.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The endpoint could not be fetched or did not answer with action metadata.
    #[error("not an action: {0}")]
    NotAnAction(String),

    /// The endpoint answered with an error body.
    #[error("action rejected: {0}")]
    Rejected(String),

    /// Metadata was syntactically valid but unusable.
    #[error("malformed action metadata: {0}")]
    Malformed(String),

    /// The action URL is not an absolute URL.
    #[error("invalid action url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ErrorCode for ResolveError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotAnAction(_) => "RESOLVE_NOT_AN_ACTION",
            Self::Rejected(_) => "RESOLVE_REJECTED",
            Self::Malformed(_) => "RESOLVE_MALFORMED",
            Self::InvalidUrl { .. } => "RESOLVE_INVALID_URL",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotAnAction(_))
    }
}

/// Failure of one protocol step.
///
/// The display string is exactly the message shown to the user, so
/// wallet and transport variants carry the upstream text verbatim.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    /// The wallet adapter raised an error (connect, sign or confirm).
    #[error("{0}")]
    Wallet(String),

    /// The action endpoint failed while building the transaction.
    #[error("{0}")]
    Transport(String),

    /// A required parameter has no value.
    #[error("missing value for parameter '{0}'")]
    MissingParameter(String),

    /// The component's link could not be turned into a URL.
    #[error("invalid action link '{href}': {reason}")]
    InvalidHref { href: String, reason: String },
}

impl ActionError {
    /// Creates a wallet error from any message.
    pub fn wallet(message: impl Into<String>) -> Self {
        Self::Wallet(message.into())
    }

    /// Creates a transport error from any message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// User-facing message, falling back to [`GENERIC_FAILURE_MESSAGE`]
    /// when the upstream error was empty.
    #[must_use]
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl ErrorCode for ActionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Wallet(_) => "ADAPTER_WALLET_FAILED",
            Self::Transport(_) => "ADAPTER_TRANSPORT_FAILED",
            Self::MissingParameter(_) => "ADAPTER_MISSING_PARAMETER",
            Self::InvalidHref { .. } => "ADAPTER_INVALID_HREF",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Wallet(_) | Self::Transport(_))
    }
}

impl From<reqwest::Error> for ActionError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
