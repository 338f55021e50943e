//! Glue between discovery and rendering.
//!
//! The discovery layer hands over [`DiscoveredLink`]s; the orchestrator
//! decides whether each one is rendered at all and, if so, builds the
//! [`ExecutionController`] for it.

use crate::action::{ActionResolver, TransactionAdapter, TransportResolver};
use crate::callbacks::{ActionCallbacks, NoopCallbacks};
use crate::config::{GateConfig, Limits};
use crate::controller::ExecutionController;
use crate::link::DiscoveredLink;
use crate::registry::{RefreshHandle, TrustLookup, TrustRegistry};
use actgate_security::NormalizedPolicy;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Mounts controllers for discovered links.
pub struct Orchestrator {
    lookup: Arc<dyn TrustLookup>,
    resolver: Arc<dyn ActionResolver>,
    policy: NormalizedPolicy,
    limits: Limits,
    refresh_interval: Duration,
    callbacks: Arc<dyn ActionCallbacks>,
}

impl Orchestrator {
    pub fn new(
        lookup: Arc<dyn TrustLookup>,
        resolver: Arc<dyn ActionResolver>,
        config: &GateConfig,
    ) -> Self {
        Self {
            lookup,
            resolver,
            policy: config.policy(),
            limits: config.limits,
            refresh_interval: config.registry.refresh_interval(),
            callbacks: Arc::new(NoopCallbacks),
        }
    }

    /// Production wiring: an HTTP-backed registry and an HTTP action
    /// transport, both built from `config`.
    ///
    /// The registry is returned for [`start_registry`](Self::start_registry).
    pub fn with_http(
        config: &GateConfig,
        adapter: Arc<dyn TransactionAdapter>,
    ) -> (Self, Arc<TrustRegistry>) {
        let registry = Arc::new(TrustRegistry::new(config.registry.source()));
        let transport = config.registry.action_transport();
        let resolver = TransportResolver::new(Arc::new(transport), adapter);
        let orchestrator = Self::new(registry.clone(), Arc::new(resolver), config);
        (orchestrator, registry)
    }

    #[must_use]
    pub fn with_callbacks(mut self, callbacks: Arc<dyn ActionCallbacks>) -> Self {
        self.callbacks = callbacks;
        self
    }

    #[must_use]
    pub fn policy(&self) -> NormalizedPolicy {
        self.policy
    }

    /// Performs the first registry refresh, then schedules further ones at
    /// the configured interval.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start_registry(&self, registry: &Arc<TrustRegistry>) -> RefreshHandle {
        registry.init().await;
        registry.start(self.refresh_interval)
    }

    /// Resolves `link` and builds its controller.
    ///
    /// Returns `None` when the link is not admitted by the policy of its
    /// own domain (nothing is rendered for it) or when it does not
    /// resolve to an action.
    pub async fn mount(&self, link: DiscoveredLink) -> Option<ExecutionController> {
        let evaluation = link.assess(self.lookup.as_ref()).evaluate(&self.policy);
        if !evaluation.admitted {
            debug!(
                action = %link.action_url,
                overall = %evaluation.overall,
                "link not admitted, skipping"
            );
            return None;
        }

        let model = match self.resolver.resolve(&link.action_url).await {
            Ok(model) => model,
            Err(e) => {
                debug!(action = %link.action_url, error = %e, "not an action, skipping");
                return None;
            }
        };

        self.callbacks
            .on_mount(&model, link.original_url(), evaluation.overall);

        Some(
            ExecutionController::new(model, link, Arc::clone(&self.lookup), self.policy)
                .with_limits(self.limits)
                .with_callbacks(Arc::clone(&self.callbacks)),
        )
    }
}
