//! A single invocable unit of an action.

use super::{ActionError, ActionTransport, PostResponse};
use actgate_types::ComponentId;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// The single named input a component may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionParameter {
    pub name: String,
    pub label: Option<String>,
    pub required: bool,
}

impl ActionParameter {
    /// Label shown to the user; falls back to the parameter name.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// One button or input of an [`ActionModel`](super::ActionModel).
///
/// Components are owned by exactly one model and identified by a
/// [`ComponentId`] derived from the action URL and their position, so
/// rebuilding a model yields the same ids.
#[derive(Clone)]
pub struct ActionComponent {
    id: ComponentId,
    label: String,
    href: String,
    base: Url,
    parameter: Option<ActionParameter>,
    value: Option<String>,
    transport: Arc<dyn ActionTransport>,
}

impl ActionComponent {
    pub(crate) fn new(
        id: ComponentId,
        label: String,
        href: String,
        base: Url,
        parameter: Option<ActionParameter>,
        transport: Arc<dyn ActionTransport>,
    ) -> Self {
        Self {
            id,
            label,
            href,
            base,
            parameter,
            value: None,
            transport,
        }
    }

    #[must_use]
    pub fn id(&self) -> ComponentId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn parameter(&self) -> Option<&ActionParameter> {
        self.parameter.as_ref()
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Sets the parameter value. Ignored for parameterless components.
    pub fn set_value(&mut self, value: impl Into<String>) {
        if self.parameter.is_some() {
            self.value = Some(value.into());
        }
    }

    /// The href with the parameter substituted, joined against the action URL.
    ///
    /// # Errors
    ///
    /// [`ActionError::MissingParameter`] when a required value is absent,
    /// [`ActionError::InvalidHref`] when the result is not a valid URL.
    pub fn resolved_href(&self) -> Result<Url, ActionError> {
        let mut href = self.href.clone();
        if let Some(param) = &self.parameter {
            let value = self.value.as_deref().unwrap_or_default();
            if param.required && value.trim().is_empty() {
                return Err(ActionError::MissingParameter(param.name.clone()));
            }
            href = href.replace(&format!("{{{}}}", param.name), &encode_component(value));
        }
        self.base.join(&href).map_err(|e| ActionError::InvalidHref {
            href: self.href.clone(),
            reason: e.to_string(),
        })
    }

    /// Asks the action endpoint to build a transaction for `account`.
    ///
    /// # Errors
    ///
    /// Any [`ActionError`] from href resolution or the transport.
    pub async fn post(&self, account: &str) -> Result<PostResponse, ActionError> {
        let href = self.resolved_href()?;
        tracing::debug!(component = %self.id, href = %href, "posting action");
        self.transport.post(href.as_str(), account).await
    }
}

impl fmt::Debug for ActionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionComponent")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("href", &self.href)
            .field("parameter", &self.parameter)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Percent-encodes a path or query segment value (`%20` for spaces).
fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionMetadata, ResolveError};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        posted: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ActionTransport for RecordingTransport {
        async fn fetch(&self, url: &str) -> Result<ActionMetadata, ResolveError> {
            Err(ResolveError::NotAnAction(url.to_string()))
        }

        async fn post(&self, href: &str, account: &str) -> Result<PostResponse, ActionError> {
            self.posted.lock().push((href.to_string(), account.to_string()));
            Ok(PostResponse::transaction("tx"))
        }
    }

    fn component(href: &str, parameter: Option<ActionParameter>) -> (ActionComponent, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let base = Url::parse("https://dial.to/api/donate").unwrap();
        let c = ActionComponent::new(
            ComponentId::derive(base.as_str(), 0),
            "Donate".into(),
            href.into(),
            base,
            parameter,
            transport.clone(),
        );
        (c, transport)
    }

    fn amount(required: bool) -> Option<ActionParameter> {
        Some(ActionParameter {
            name: "amount".into(),
            label: None,
            required,
        })
    }

    #[test]
    fn relative_href_joins_against_action_url() {
        let (c, _) = component("/api/donate/1", None);
        assert_eq!(c.resolved_href().unwrap().as_str(), "https://dial.to/api/donate/1");
    }

    #[test]
    fn absolute_href_is_kept() {
        let (c, _) = component("https://other.example/tx", None);
        assert_eq!(c.resolved_href().unwrap().as_str(), "https://other.example/tx");
    }

    #[test]
    fn parameter_is_substituted_and_encoded() {
        let (mut c, _) = component("/api/donate?amount={amount}", amount(true));
        c.set_value("1 SOL+tip");
        assert_eq!(
            c.resolved_href().unwrap().as_str(),
            "https://dial.to/api/donate?amount=1%20SOL%2Btip"
        );
    }

    #[test]
    fn required_parameter_must_be_set() {
        let (c, _) = component("/api/donate/{amount}", amount(true));
        assert!(matches!(c.resolved_href(), Err(ActionError::MissingParameter(name)) if name == "amount"));
    }

    #[test]
    fn optional_parameter_substitutes_empty() {
        let (c, _) = component("/api/donate?memo={amount}", amount(false));
        assert_eq!(c.resolved_href().unwrap().as_str(), "https://dial.to/api/donate?memo=");
    }

    #[test]
    fn value_ignored_without_parameter() {
        let (mut c, _) = component("/x", None);
        c.set_value("5");
        assert!(c.value().is_none());
    }

    #[test]
    fn display_label_falls_back_to_name() {
        assert_eq!(amount(true).unwrap().display_label(), "amount");
    }

    #[tokio::test]
    async fn post_sends_resolved_href_and_account() {
        let (mut c, transport) = component("/api/donate/{amount}", amount(true));
        c.set_value("2");
        let resp = c.post("wallet-1").await.unwrap();
        assert_eq!(resp.transaction.as_deref(), Some("tx"));
        assert_eq!(
            transport.posted.lock().as_slice(),
            &[("https://dial.to/api/donate/2".to_string(), "wallet-1".to_string())]
        );
    }
}
