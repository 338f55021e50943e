//! Wire types exchanged with action endpoints.

use serde::{Deserialize, Serialize};

/// Body of an action endpoint's `GET` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMetadata {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Label of the implicit component when there are no `links`.
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub links: Option<ActionLinks>,
    /// Present when the endpoint refuses to serve the action.
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLinks {
    #[serde(default)]
    pub actions: Vec<LinkedAction>,
}

/// One linked component: a label and an href template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAction {
    pub label: String,
    /// Absolute or relative to the action URL; may contain `{name}`
    /// placeholders for its parameter.
    pub href: String,
    #[serde(default)]
    pub parameters: Vec<LinkedParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedParameter {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Body sent to the component's href when executing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRequest {
    pub account: String,
}

/// Body returned by the component's href.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    /// Serialized transaction to sign. Missing means nothing to execute.
    #[serde(default)]
    pub transaction: Option<String>,
    /// Shown to the user once the transaction is confirmed.
    #[serde(default)]
    pub message: Option<String>,
}

impl PostResponse {
    #[must_use]
    pub fn transaction(transaction: impl Into<String>) -> Self {
        Self {
            transaction: Some(transaction.into()),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
