//! Core types for actgate.
//!
//! This crate is the leaf of the actgate dependency graph. It holds the
//! vocabulary every other crate speaks: trust levels, classification
//! domains, component identifiers and the error code contract.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  actgate-types    : TrustLevel, TrustDomain, ComponentId    │ ◄── HERE
//! ├─────────────────────────────────────────────────────────────┤
//! │  actgate-security : SecurityPolicy, admits/merge/evaluate   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  actgate-runtime  : TrustRegistry, ActionModel,             │
//! │                     ExecutionController, Orchestrator       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use actgate_types::{ComponentId, TrustDomain, TrustLevel};
//!
//! let level: TrustLevel = "malicious".parse().unwrap();
//! assert!(level.is_more_restrictive_than(TrustLevel::Unknown));
//!
//! let a = ComponentId::derive("https://example.com/api/donate", 0);
//! let b = ComponentId::derive("https://example.com/api/donate", 0);
//! assert_eq!(a, b);
//!
//! assert_eq!(TrustDomain::Actions.as_str(), "actions");
//! ```

mod error;
mod id;
mod trust;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::ComponentId;
pub use trust::{ParseTrustError, TrustDomain, TrustLevel};
