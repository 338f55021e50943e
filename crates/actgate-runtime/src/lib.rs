//! actgate runtime - trust registry, actions and gated execution.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Vocabulary Layer                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  actgate-types    : TrustLevel, TrustDomain, ComponentId    │
//! │  actgate-security : SecurityPolicy, admits, merge, evaluate │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  registry/     : TrustRegistry, RegistrySource, snapshots   │
//! │  action/       : ActionModel, components, transport, wallet │
//! │  controller/   : ExecutionController, state machine, views  │
//! │  orchestrator  : discovery → controller wiring              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`registry`] - Trust Data
//!
//! - [`TrustRegistry`](registry::TrustRegistry): periodically refreshed classifications
//! - [`TrustLookup`](registry::TrustLookup): synchronous lookup seam
//!
//! ## [`action`] - Resolved Actions
//!
//! - [`ActionModel`](action::ActionModel): metadata plus components
//! - [`TransactionAdapter`](action::TransactionAdapter): host wallet integration
//! - [`ActionResolver`](action::ActionResolver): link → model
//!
//! ## [`controller`] - Gated Execution
//!
//! - [`ExecutionController`](controller::ExecutionController): re-validates trust and runs the protocol
//! - [`apply`](controller::apply): the pure transition function
//! - [`ActionView`](controller::ActionView): view-models for rendering
//!
//! ## [`config`] - Configuration
//!
//! - [`GateConfig`](config::GateConfig): policy, registry and limits
//! - [`ConfigLoader`](config::ConfigLoader): defaults → global → project → env
//!
//! ## [`testing`] - Test Doubles
//!
//! Scripted wallet, transport and registry source for host tests.
//!
//! # Logging
//!
//! Everything logs through `tracing`. The crate never installs a
//! subscriber; hosts choose one.

pub mod action;
pub mod callbacks;
pub mod config;
pub mod controller;
pub mod link;
pub mod orchestrator;
pub mod registry;
pub mod testing;

pub use action::{
    ActionComponent, ActionError, ActionModel, ActionResolver, ActionTransport,
    ExecutionContext, HttpActionTransport, ResolveError, SignOutcome, TransactionAdapter,
    TransportResolver,
};
pub use callbacks::{ActionCallbacks, NoopCallbacks};
pub use config::{ConfigError, ConfigLoader, GateConfig, Limits};
pub use controller::{
    ActionView, ExecuteError, ExecutionController, ExecutionEvent, ExecutionState,
    ExecutionStatus,
};
pub use link::{DiscoveredLink, LinkOrigin};
pub use orchestrator::Orchestrator;
pub use registry::{
    HttpRegistrySource, RefreshHandle, RegistryError, RegistrySource, TrustLookup, TrustRegistry,
};

pub use actgate_security::{NormalizedPolicy, PolicyConfig, SecurityPolicy};
pub use actgate_types::{ComponentId, TrustDomain, TrustLevel};
