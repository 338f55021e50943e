//! Security gate for actgate.
//!
//! This crate turns trust classifications into admission decisions.
//! It is pure and synchronous: no registry access, no I/O. The runtime
//! feeds it fresh classifications and acts on the verdict.
//!
//! # Two-Check Admission
//!
//! ```text
//! admitted = admits(action_level, policy.actions)
//!          ∧ (no origin ∨ admits(origin_level, policy[origin_domain]))
//!
//! overall  = merge(action_level, origin_level)   // most restrictive wins
//! ```
//!
//! | Policy | trusted | unknown | malicious |
//! |--------|---------|---------|-----------|
//! | `only-trusted` | ✓ | ✗ | ✗ |
//! | `non-malicious` | ✓ | ✓ | ✗ |
//! | `all` | ✓ | ✓ | ✓ |
//!
//! Both checks are required independently. An admitted action hosted on a
//! denied origin is not admitted, and vice versa.
//!
//! # Example
//!
//! ```
//! use actgate_security::{evaluate, NormalizedPolicy, OriginTrust, SecurityPolicy};
//! use actgate_types::{TrustDomain, TrustLevel};
//!
//! let policy = NormalizedPolicy::uniform(SecurityPolicy::OnlyTrusted);
//! let origin = OriginTrust::new(TrustDomain::Websites, TrustLevel::Malicious);
//!
//! let verdict = evaluate(TrustLevel::Trusted, Some(origin), &policy);
//! assert!(!verdict.admitted);
//! assert_eq!(verdict.overall, TrustLevel::Malicious);
//! ```

pub mod error;
pub mod gate;
pub mod policy;

pub use error::PolicyParseError;
pub use gate::{admits, evaluate, merge, merge_all, Evaluation, OriginTrust, TrustAssessment};
pub use policy::{NormalizedPolicy, PolicyConfig, SecurityPolicy};

pub use actgate_types::{TrustDomain, TrustLevel};
