//! Wallet-side collaborator.
//!
//! The engine never talks to a wallet directly. Hosts implement
//! [`TransactionAdapter`] and the controller drives it through the
//! connect → sign → confirm steps.

use super::ActionError;
use actgate_types::{ComponentId, TrustLevel};
use async_trait::async_trait;

/// Facts about the action being executed, passed to every adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// The URL the user saw: the enclosing origin if any, else the action URL.
    pub original_url: String,
    pub action_url: String,
    pub title: String,
    /// Action-level classification at the time the step was dispatched.
    pub trust: TrustLevel,
    pub component: ComponentId,
}

/// Result of a signing request that did not raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutcome {
    Signed { signature: String },
    /// The wallet refused without raising (user rejected, nothing signed).
    Declined { reason: Option<String> },
}

impl SignOutcome {
    #[must_use]
    pub fn signed(signature: impl Into<String>) -> Self {
        Self::Signed {
            signature: signature.into(),
        }
    }

    #[must_use]
    pub fn declined() -> Self {
        Self::Declined { reason: None }
    }

    /// Signature, if one was produced and is non-empty.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        match self {
            Self::Signed { signature } if !signature.is_empty() => Some(signature),
            _ => None,
        }
    }
}

/// Wallet / session integration supplied by the host.
///
/// Every method may fail with [`ActionError`]; the controller turns such
/// failures into the `error` status. Returning `Ok(None)` from
/// [`connect`](Self::connect) or [`SignOutcome::Declined`] from
/// [`sign_transaction`](Self::sign_transaction) is a silent cancel.
#[async_trait]
pub trait TransactionAdapter: Send + Sync {
    /// Returns the account to act for, or `None` when the user declined.
    async fn connect(&self, context: &ExecutionContext) -> Result<Option<String>, ActionError>;

    async fn sign_transaction(
        &self,
        transaction: &str,
        context: &ExecutionContext,
    ) -> Result<SignOutcome, ActionError>;

    async fn confirm_transaction(
        &self,
        signature: &str,
        context: &ExecutionContext,
    ) -> Result<(), ActionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signature_is_not_a_signature() {
        assert_eq!(SignOutcome::signed("5xSig").signature(), Some("5xSig"));
        assert_eq!(SignOutcome::signed("").signature(), None);
        assert_eq!(SignOutcome::declined().signature(), None);
    }
}
