//! View-models for the rendering layer.
//!
//! Everything here is derived from the [`ActionModel`], the current
//! [`ExecutionState`] and the stored [`Evaluation`]. Nothing is cached.

use super::{ExecutionState, ExecutionStatus};
use crate::action::{ActionComponent, ActionModel};
use crate::config::Limits;
use actgate_security::Evaluation;
use actgate_types::{ComponentId, TrustLevel};
use serde::Serialize;

const LABEL_EXECUTING: &str = "Executing";
const LABEL_COMPLETED: &str = "Completed";
const LABEL_FAILED: &str = "Failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Default,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    pub id: ComponentId,
    pub label: String,
    pub loading: bool,
    pub disabled: bool,
    pub variant: ButtonVariant,
}

/// A single-parameter component: a text field plus its submit button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputView {
    pub name: String,
    pub placeholder: String,
    pub required: bool,
    pub value: Option<String>,
    pub button: ButtonView,
}

/// Advisory shown above the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Disclaimer {
    /// Flagged malicious and currently blocked. `ignorable` when the user
    /// may override.
    Blocked { ignorable: bool },
    /// Not in the registry.
    Unknown,
}

impl Disclaimer {
    /// Fixed advisory text.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Blocked { .. } => {
                "This action or its origin has been flagged as unsafe and has been blocked. \
                 If you believe this is a mistake, report it to the registry maintainers."
            }
            Self::Unknown => {
                "This action has not been registered yet. Only use it if you trust the source."
            }
        }
    }

    fn derive(overall: TrustLevel, status: ExecutionStatus, override_permitted: bool) -> Option<Self> {
        match (overall, status) {
            (TrustLevel::Malicious, ExecutionStatus::Blocked) => Some(Self::Blocked {
                ignorable: override_permitted,
            }),
            (TrustLevel::Unknown, _) => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Everything the rendering layer needs for one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub status: ExecutionStatus,
    pub disclaimer: Option<Disclaimer>,
    pub buttons: Vec<ButtonView>,
    pub inputs: Vec<InputView>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

pub(super) fn derive(
    model: &ActionModel,
    state: &ExecutionState,
    evaluation: Evaluation,
    limits: Limits,
) -> ActionView {
    let button = |c: &ActionComponent| button_view(model, state, c);
    let input = |c: &ActionComponent| input_view(model, state, c);

    // Once a component is in flight (or finished) it is the only one offered.
    let (buttons, inputs) = match state.executing.and_then(|id| model.component(id)) {
        Some(c) if c.parameter().is_some() => (Vec::new(), vec![input(c)]),
        Some(c) => (vec![button(c)], Vec::new()),
        None => (
            model.buttons().take(limits.max_buttons).map(button).collect(),
            model.inputs().take(limits.max_inputs).map(input).collect(),
        ),
    };

    ActionView {
        title: model.title().to_string(),
        description: model.description().to_string(),
        icon: model.icon().to_string(),
        status: state.status,
        disclaimer: Disclaimer::derive(evaluation.overall, state.status, evaluation.override_permitted()),
        buttons,
        inputs,
        error_message: state.error_message.clone(),
        success_message: state.success_message.clone(),
    }
}

/// Whether `id` is among the components the view offers under `limits`.
pub(super) fn is_offered(model: &ActionModel, id: ComponentId, limits: Limits) -> bool {
    model
        .buttons()
        .take(limits.max_buttons)
        .chain(model.inputs().take(limits.max_inputs))
        .any(|c| c.id() == id)
}

fn button_view(model: &ActionModel, state: &ExecutionState, component: &ActionComponent) -> ButtonView {
    let current = state.is_executing(component.id());
    let label = match (current, state.status) {
        (true, ExecutionStatus::Executing) => LABEL_EXECUTING,
        (true, ExecutionStatus::Success) => LABEL_COMPLETED,
        (true, ExecutionStatus::Error) => LABEL_FAILED,
        _ => component.label(),
    };
    let variant = match state.status {
        ExecutionStatus::Success => ButtonVariant::Success,
        ExecutionStatus::Error => ButtonVariant::Error,
        _ => ButtonVariant::Default,
    };
    ButtonView {
        id: component.id(),
        label: label.to_string(),
        loading: current && state.status == ExecutionStatus::Executing,
        disabled: model.is_disabled() || !state.status.is_ready(),
        variant,
    }
}

fn input_view(model: &ActionModel, state: &ExecutionState, component: &ActionComponent) -> InputView {
    let (name, placeholder, required) = component
        .parameter()
        .map(|p| (p.name.clone(), p.display_label().to_string(), p.required))
        .unwrap_or_default();
    InputView {
        name,
        placeholder,
        required,
        value: component.value().map(str::to_string),
        button: button_view(model, state, component),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disclaimer_rules() {
        assert_eq!(
            Disclaimer::derive(TrustLevel::Malicious, ExecutionStatus::Blocked, true),
            Some(Disclaimer::Blocked { ignorable: true })
        );
        assert_eq!(
            Disclaimer::derive(TrustLevel::Malicious, ExecutionStatus::Blocked, false),
            Some(Disclaimer::Blocked { ignorable: false })
        );
        // Overridden: malicious but idle shows nothing.
        assert_eq!(Disclaimer::derive(TrustLevel::Malicious, ExecutionStatus::Idle, true), None);
        assert_eq!(
            Disclaimer::derive(TrustLevel::Unknown, ExecutionStatus::Blocked, false),
            Some(Disclaimer::Unknown)
        );
        assert_eq!(Disclaimer::derive(TrustLevel::Trusted, ExecutionStatus::Idle, true), None);
    }

    #[test]
    fn disclaimer_texts_are_distinct() {
        assert_ne!(Disclaimer::Unknown.message(), Disclaimer::Blocked { ignorable: true }.message());
    }
}
