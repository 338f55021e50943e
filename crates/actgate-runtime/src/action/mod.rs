//! Resolved actions.
//!
//! An [`ActionModel`] is built once per discovered link from the
//! endpoint's [`ActionMetadata`]. After that only the `disabled` flag and
//! component parameter values change.
//!
//! ```text
//! ActionResolver ──fetch──► ActionMetadata ──from_metadata──► ActionModel
//!                                                              ├─ ActionComponent (id 0)
//!                                                              ├─ ActionComponent (id 1)
//!                                                              └─ TransactionAdapter
//! ```

mod adapter;
mod component;
mod error;
mod metadata;
mod resolver;
mod transport;

pub use adapter::{ExecutionContext, SignOutcome, TransactionAdapter};
pub use component::{ActionComponent, ActionParameter};
pub use error::{ActionError, ResolveError, GENERIC_FAILURE_MESSAGE};
pub use metadata::{
    ActionLinks, ActionMetadata, ErrorBody, LinkedAction, LinkedParameter, PostRequest,
    PostResponse,
};
pub use resolver::{ActionResolver, TransportResolver};
pub use transport::{ActionTransport, HttpActionTransport, DEFAULT_ACTION_TIMEOUT};

use actgate_types::ComponentId;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// One resolved action and its components.
#[derive(Clone)]
pub struct ActionModel {
    url: Url,
    title: String,
    description: String,
    icon: String,
    disabled: bool,
    components: Vec<ActionComponent>,
    adapter: Arc<dyn TransactionAdapter>,
}

impl ActionModel {
    /// Validates `metadata` fetched from `url` and builds the model.
    ///
    /// Without `links`, the action has a single parameterless component
    /// labelled with `metadata.label` that posts back to `url`. Linked
    /// components keep their order; only their first parameter is used.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidUrl`] if `url` is not absolute
    /// - [`ResolveError::Rejected`] if the metadata carries an error body
    /// - [`ResolveError::Malformed`] if the title is empty or there are no components
    pub fn from_metadata(
        url: &str,
        metadata: ActionMetadata,
        transport: Arc<dyn ActionTransport>,
        adapter: Arc<dyn TransactionAdapter>,
    ) -> Result<Self, ResolveError> {
        let base = Url::parse(url).map_err(|e| ResolveError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(error) = metadata.error {
            return Err(ResolveError::Rejected(error.message));
        }
        if metadata.title.trim().is_empty() {
            return Err(ResolveError::Malformed("missing title".into()));
        }

        let components: Vec<ActionComponent> = match metadata.links {
            None => vec![ActionComponent::new(
                ComponentId::derive(base.as_str(), 0),
                metadata.label,
                base.to_string(),
                base.clone(),
                None,
                Arc::clone(&transport),
            )],
            Some(links) => links
                .actions
                .into_iter()
                .enumerate()
                .map(|(index, linked)| {
                    let parameter = linked.parameters.into_iter().next().map(|p| ActionParameter {
                        name: p.name,
                        label: p.label,
                        required: p.required,
                    });
                    ActionComponent::new(
                        ComponentId::derive(base.as_str(), index),
                        linked.label,
                        linked.href,
                        base.clone(),
                        parameter,
                        Arc::clone(&transport),
                    )
                })
                .collect(),
        };

        if components.is_empty() {
            return Err(ResolveError::Malformed("no linked actions".into()));
        }

        Ok(Self {
            url: base,
            title: metadata.title,
            description: metadata.description,
            icon: metadata.icon,
            disabled: metadata.disabled,
            components,
            adapter,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    #[must_use]
    pub fn adapter(&self) -> &Arc<dyn TransactionAdapter> {
        &self.adapter
    }

    /// All components in metadata order.
    #[must_use]
    pub fn components(&self) -> &[ActionComponent] {
        &self.components
    }

    #[must_use]
    pub fn component(&self, id: ComponentId) -> Option<&ActionComponent> {
        self.components.iter().find(|c| c.id() == id)
    }

    /// Sets a component's parameter value. Returns `false` for unknown ids.
    pub fn set_value(&mut self, id: ComponentId, value: impl Into<String>) -> bool {
        match self.components.iter_mut().find(|c| c.id() == id) {
            Some(component) => {
                component.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Parameterless components.
    pub fn buttons(&self) -> impl Iterator<Item = &ActionComponent> {
        self.components.iter().filter(|c| c.parameter().is_none())
    }

    /// Single-parameter components.
    pub fn inputs(&self) -> impl Iterator<Item = &ActionComponent> {
        self.components.iter().filter(|c| c.parameter().is_some())
    }
}

impl fmt::Debug for ActionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionModel")
            .field("url", &self.url.as_str())
            .field("title", &self.title)
            .field("disabled", &self.disabled)
            .field("components", &self.components)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoTransport;

    #[async_trait]
    impl ActionTransport for NoTransport {
        async fn fetch(&self, url: &str) -> Result<ActionMetadata, ResolveError> {
            Err(ResolveError::NotAnAction(url.to_string()))
        }
        async fn post(&self, _href: &str, _account: &str) -> Result<PostResponse, ActionError> {
            Err(ActionError::transport("offline"))
        }
    }

    struct NoWallet;

    #[async_trait]
    impl TransactionAdapter for NoWallet {
        async fn connect(&self, _: &ExecutionContext) -> Result<Option<String>, ActionError> {
            Ok(None)
        }
        async fn sign_transaction(&self, _: &str, _: &ExecutionContext) -> Result<SignOutcome, ActionError> {
            Ok(SignOutcome::declined())
        }
        async fn confirm_transaction(&self, _: &str, _: &ExecutionContext) -> Result<(), ActionError> {
            Ok(())
        }
    }

    const URL: &str = "https://dial.to/api/donate";

    fn build(metadata: ActionMetadata) -> Result<ActionModel, ResolveError> {
        ActionModel::from_metadata(URL, metadata, Arc::new(NoTransport), Arc::new(NoWallet))
    }

    fn linked() -> ActionMetadata {
        ActionMetadata {
            title: "Donate".into(),
            label: "Donate".into(),
            links: Some(ActionLinks {
                actions: vec![
                    LinkedAction {
                        label: "1 SOL".into(),
                        href: "/api/donate/1".into(),
                        parameters: vec![],
                    },
                    LinkedAction {
                        label: "Custom".into(),
                        href: "/api/donate/{amount}".into(),
                        parameters: vec![
                            LinkedParameter {
                                name: "amount".into(),
                                label: Some("Amount".into()),
                                required: true,
                            },
                            LinkedParameter {
                                name: "memo".into(),
                                label: None,
                                required: false,
                            },
                        ],
                    },
                ],
            }),
            ..ActionMetadata::default()
        }
    }

    #[test]
    fn no_links_yields_single_default_component() {
        let model = build(ActionMetadata {
            title: "Mint".into(),
            label: "Mint now".into(),
            ..ActionMetadata::default()
        })
        .unwrap();
        assert_eq!(model.components().len(), 1);
        let only = &model.components()[0];
        assert_eq!(only.label(), "Mint now");
        assert!(only.parameter().is_none());
        assert_eq!(only.resolved_href().unwrap().as_str(), URL);
    }

    #[test]
    fn linked_components_keep_order_and_first_parameter() {
        let model = build(linked()).unwrap();
        let labels: Vec<_> = model.components().iter().map(ActionComponent::label).collect();
        assert_eq!(labels, ["1 SOL", "Custom"]);
        assert_eq!(model.buttons().count(), 1);
        assert_eq!(model.inputs().count(), 1);
        assert_eq!(model.components()[1].parameter().unwrap().name, "amount");
    }

    #[test]
    fn ids_are_stable_across_rebuilds() {
        let a = build(linked()).unwrap();
        let b = build(linked()).unwrap();
        let ids_a: Vec<_> = a.components().iter().map(ActionComponent::id).collect();
        let ids_b: Vec<_> = b.components().iter().map(ActionComponent::id).collect();
        assert_eq!(ids_a, ids_b);
        assert_ne!(ids_a[0], ids_a[1]);
    }

    #[test]
    fn error_body_is_rejected() {
        let err = build(ActionMetadata {
            title: "Donate".into(),
            error: Some(ErrorBody {
                message: "campaign ended".into(),
            }),
            ..ActionMetadata::default()
        })
        .unwrap_err();
        assert!(matches!(err, ResolveError::Rejected(m) if m == "campaign ended"));
    }

    #[test]
    fn missing_title_is_malformed() {
        assert!(matches!(build(ActionMetadata::default()), Err(ResolveError::Malformed(_))));
    }

    #[test]
    fn empty_links_is_malformed() {
        let err = build(ActionMetadata {
            title: "Donate".into(),
            links: Some(ActionLinks::default()),
            ..ActionMetadata::default()
        })
        .unwrap_err();
        assert!(matches!(err, ResolveError::Malformed(_)));
    }

    #[test]
    fn relative_url_is_invalid() {
        let err = ActionModel::from_metadata(
            "/api/donate",
            linked(),
            Arc::new(NoTransport),
            Arc::new(NoWallet),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidUrl { .. }));
    }

    #[test]
    fn mutable_surface() {
        let mut model = build(linked()).unwrap();
        let custom = model.components()[1].id();
        assert!(model.set_value(custom, "3"));
        assert_eq!(model.component(custom).unwrap().value(), Some("3"));
        assert!(!model.set_value(ComponentId::derive("https://elsewhere.example", 0), "1"));

        assert!(!model.is_disabled());
        model.set_disabled(true);
        assert!(model.is_disabled());
    }
}
