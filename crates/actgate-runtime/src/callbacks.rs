//! Host lifecycle callbacks.
//!
//! Purely observational: implementations see the model and views but
//! cannot influence admission or execution.

use crate::action::ActionModel;
use crate::controller::ActionView;
use actgate_types::TrustLevel;

/// Hooks invoked at mount and render time. All methods default to no-ops.
pub trait ActionCallbacks: Send + Sync {
    /// A controller was created for `model`.
    ///
    /// `original_url` is the URL the user saw; `overall` the merged
    /// classification at mount time.
    fn on_mount(&self, model: &ActionModel, original_url: &str, overall: TrustLevel) {
        let _ = (model, original_url, overall);
    }

    /// A view was derived for rendering.
    fn on_render(&self, view: &ActionView) {
        let _ = view;
    }
}

/// Callbacks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl ActionCallbacks for NoopCallbacks {}
