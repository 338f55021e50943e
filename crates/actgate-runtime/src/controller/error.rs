//! Execution controller errors.

use super::ExecutionStatus;
use actgate_types::{ComponentId, ErrorCode};
use thiserror::Error;

/// Caller misuse of [`ExecutionController::execute`](super::ExecutionController::execute).
///
/// Protocol failures never show up here; they land in the state as `error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    #[error("component {0} does not belong to this action")]
    UnknownComponent(ComponentId),

    #[error("component {0} is not offered")]
    NotOffered(ComponentId),

    #[error("action is disabled")]
    Disabled,

    #[error("cannot execute while {0}")]
    NotIdle(ExecutionStatus),

    #[error("previous run is still waiting on the wallet")]
    InFlight,
}

impl ErrorCode for ExecuteError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownComponent(_) => "EXECUTE_UNKNOWN_COMPONENT",
            Self::NotOffered(_) => "EXECUTE_NOT_OFFERED",
            Self::Disabled => "EXECUTE_DISABLED",
            Self::NotIdle(_) => "EXECUTE_NOT_IDLE",
            Self::InFlight => "EXECUTE_IN_FLIGHT",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotIdle(_) | Self::InFlight | Self::Disabled)
    }
}
