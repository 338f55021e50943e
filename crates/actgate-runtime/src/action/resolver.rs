//! Link → [`ActionModel`] resolution.

use super::{ActionModel, ActionTransport, ResolveError, TransactionAdapter};
use async_trait::async_trait;
use std::sync::Arc;

/// Turns a discovered action URL into a validated model.
///
/// Any error means "not an action": the caller renders nothing.
#[async_trait]
pub trait ActionResolver: Send + Sync {
    async fn resolve(&self, action_url: &str) -> Result<ActionModel, ResolveError>;
}

/// Resolver that fetches metadata through an [`ActionTransport`] and hands
/// every model the same wallet adapter.
#[derive(Clone)]
pub struct TransportResolver {
    transport: Arc<dyn ActionTransport>,
    adapter: Arc<dyn TransactionAdapter>,
}

impl TransportResolver {
    #[must_use]
    pub fn new(transport: Arc<dyn ActionTransport>, adapter: Arc<dyn TransactionAdapter>) -> Self {
        Self { transport, adapter }
    }
}

#[async_trait]
impl ActionResolver for TransportResolver {
    async fn resolve(&self, action_url: &str) -> Result<ActionModel, ResolveError> {
        let metadata = self.transport.fetch(action_url).await?;
        ActionModel::from_metadata(
            action_url,
            metadata,
            Arc::clone(&self.transport),
            Arc::clone(&self.adapter),
        )
    }
}
