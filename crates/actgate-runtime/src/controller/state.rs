//! Execution state machine.
//!
//! # Lifecycle
//!
//! ```text
//!            Unblock
//!   Blocked ────────► Idle ──Init──► Executing ──Finish──► Success
//!      ▲               ▲ ▲               │
//!      └─────Block─────┘ └─Reset/SoftReset┤
//!                                        └──Fail────► Error
//!
//!   Reset: any state → Idle
//! ```
//!
//! [`apply`] is pure: it never performs I/O and ignores events that are
//! not legal from the current status, returning the state unchanged.

use actgate_types::ComponentId;
use serde::{Deserialize, Serialize};

/// Status of one rendered action.
///
/// | Category | States | Accepts `execute` |
/// |----------|--------|-------------------|
/// | Ready | `Idle` | Yes |
/// | Gated | `Blocked` | No (override first) |
/// | Active | `Executing` | No |
/// | Finished | `Success`, `Error` | No (reset first) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Idle,
    Blocked,
    Executing,
    Success,
    Error,
}

impl ExecutionStatus {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Blocked => "blocked",
            Self::Executing => "executing",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full controller state as published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionState {
    pub status: ExecutionStatus,
    /// Component currently (or last, while finished) executing.
    pub executing: Option<ComponentId>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl ExecutionState {
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn blocked() -> Self {
        Self {
            status: ExecutionStatus::Blocked,
            ..Self::default()
        }
    }

    /// Whether `id` is the component this state refers to.
    #[must_use]
    pub fn is_executing(&self, id: ComponentId) -> bool {
        self.executing == Some(id)
    }
}

/// Inputs to [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    /// Start executing a component. Idle only.
    Init(ComponentId),
    /// All steps succeeded; optional success message. Executing only.
    Finish(Option<String>),
    /// A step failed with this message. Executing only.
    Fail(String),
    /// Clear everything and return to idle. Any state.
    Reset,
    /// Cancelled mid-flight; optional note kept as the error message. Executing only.
    SoftReset(Option<String>),
    /// Re-validation denied execution. Idle only.
    Block,
    /// User dismissed the block. Blocked only.
    Unblock,
}

/// Computes the next state. Illegal events leave `state` unchanged.
#[must_use]
pub fn apply(state: ExecutionState, event: ExecutionEvent) -> ExecutionState {
    use ExecutionEvent as E;
    use ExecutionStatus as S;

    match (state.status, event) {
        (_, E::Reset) => ExecutionState::idle(),
        (S::Idle, E::Init(id)) => ExecutionState {
            status: S::Executing,
            executing: Some(id),
            error_message: None,
            success_message: None,
        },
        (S::Idle, E::Block) => ExecutionState::blocked(),
        (S::Blocked, E::Unblock) => ExecutionState::idle(),
        (S::Executing, E::Finish(message)) => ExecutionState {
            status: S::Success,
            success_message: message,
            error_message: None,
            ..state
        },
        (S::Executing, E::Fail(message)) => ExecutionState {
            status: S::Error,
            error_message: Some(message),
            success_message: None,
            ..state
        },
        (S::Executing, E::SoftReset(message)) => ExecutionState {
            error_message: message,
            ..ExecutionState::idle()
        },
        _ => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: usize) -> ComponentId {
        ComponentId::derive("https://dial.to/api/donate", index)
    }

    fn executing() -> ExecutionState {
        apply(ExecutionState::idle(), ExecutionEvent::Init(id(0)))
    }

    #[test]
    fn init_marks_exactly_one_component() {
        let s = executing();
        assert_eq!(s.status, ExecutionStatus::Executing);
        assert!(s.is_executing(id(0)));
        assert!(!s.is_executing(id(1)));
    }

    #[test]
    fn init_while_executing_is_ignored() {
        let s = apply(executing(), ExecutionEvent::Init(id(1)));
        assert!(s.is_executing(id(0)));
    }

    #[test]
    fn finish_records_success_and_keeps_component() {
        let s = apply(executing(), ExecutionEvent::Finish(Some("Swap complete".into())));
        assert_eq!(s.status, ExecutionStatus::Success);
        assert_eq!(s.success_message.as_deref(), Some("Swap complete"));
        assert!(s.error_message.is_none());
        assert!(s.is_executing(id(0)));
    }

    #[test]
    fn fail_records_error() {
        let s = apply(executing(), ExecutionEvent::Fail("insufficient funds".into()));
        assert_eq!(s.status, ExecutionStatus::Error);
        assert_eq!(s.error_message.as_deref(), Some("insufficient funds"));
        assert!(s.success_message.is_none());
    }

    #[test]
    fn soft_reset_returns_to_idle_with_note() {
        let s = apply(executing(), ExecutionEvent::SoftReset(Some("Transaction data missing".into())));
        assert_eq!(s.status, ExecutionStatus::Idle);
        assert!(s.executing.is_none());
        assert_eq!(s.error_message.as_deref(), Some("Transaction data missing"));

        let silent = apply(executing(), ExecutionEvent::SoftReset(None));
        assert_eq!(silent, ExecutionState::idle());
    }

    #[test]
    fn reset_from_every_status() {
        let states = [
            ExecutionState::idle(),
            ExecutionState::blocked(),
            executing(),
            apply(executing(), ExecutionEvent::Finish(None)),
            apply(executing(), ExecutionEvent::Fail("x".into())),
        ];
        for s in states {
            assert_eq!(apply(s, ExecutionEvent::Reset), ExecutionState::idle());
        }
    }

    #[test]
    fn block_and_unblock() {
        let blocked = apply(ExecutionState::idle(), ExecutionEvent::Block);
        assert_eq!(blocked.status, ExecutionStatus::Blocked);
        assert_eq!(apply(blocked, ExecutionEvent::Unblock), ExecutionState::idle());
    }

    #[test]
    fn illegal_events_are_ignored() {
        let blocked = ExecutionState::blocked();
        assert_eq!(apply(blocked.clone(), ExecutionEvent::Init(id(0))), blocked);
        assert_eq!(apply(blocked.clone(), ExecutionEvent::Finish(None)), blocked);

        let idle = ExecutionState::idle();
        assert_eq!(apply(idle.clone(), ExecutionEvent::Fail("x".into())), idle);
        assert_eq!(apply(idle.clone(), ExecutionEvent::Unblock), idle);

        let done = apply(executing(), ExecutionEvent::Finish(None));
        assert_eq!(apply(done.clone(), ExecutionEvent::Block), done);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ExecutionStatus::Blocked).unwrap(), "\"blocked\"");
        assert_eq!(ExecutionStatus::Success.to_string(), "success");
        assert!(ExecutionStatus::Error.is_finished());
        assert!(ExecutionStatus::Idle.is_ready());
    }
}
