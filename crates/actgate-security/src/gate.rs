//! Admission decisions.
//!
//! Everything here is a total, deterministic function of its inputs.
//! The runtime calls [`evaluate`] with classifications fetched from the
//! trust registry immediately before every permission-changing
//! transition; nothing in this module caches.

use crate::NormalizedPolicy;
use crate::SecurityPolicy;
use actgate_types::{TrustDomain, TrustLevel};
use serde::{Deserialize, Serialize};

/// Returns whether `policy` admits a subject classified as `level`.
///
/// # Example
///
/// ```
/// use actgate_security::{admits, SecurityPolicy};
/// use actgate_types::TrustLevel;
///
/// assert!(admits(TrustLevel::Unknown, SecurityPolicy::NonMalicious));
/// assert!(!admits(TrustLevel::Unknown, SecurityPolicy::OnlyTrusted));
/// assert!(admits(TrustLevel::Malicious, SecurityPolicy::All));
/// ```
#[must_use]
pub fn admits(level: TrustLevel, policy: SecurityPolicy) -> bool {
    match (policy, level) {
        (SecurityPolicy::All, _) => true,
        (SecurityPolicy::NonMalicious, TrustLevel::Trusted | TrustLevel::Unknown) => true,
        (SecurityPolicy::NonMalicious, TrustLevel::Malicious) => false,
        (SecurityPolicy::OnlyTrusted, TrustLevel::Trusted) => true,
        (SecurityPolicy::OnlyTrusted, TrustLevel::Unknown | TrustLevel::Malicious) => false,
    }
}

/// Merges two classifications, keeping the more restrictive one.
///
/// Returns `a` unchanged when `b` is absent.
#[must_use]
pub fn merge(a: TrustLevel, b: Option<TrustLevel>) -> TrustLevel {
    match b {
        Some(b) if b.is_more_restrictive_than(a) => b,
        _ => a,
    }
}

/// Merges any number of classifications. An empty input is `trusted`,
/// the identity of the merge.
#[must_use]
pub fn merge_all(levels: impl IntoIterator<Item = TrustLevel>) -> TrustLevel {
    levels
        .into_iter()
        .fold(TrustLevel::Trusted, |acc, level| merge(acc, Some(level)))
}

/// Classification of the page an action link was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginTrust {
    /// Registry table the origin was looked up in; selects the policy.
    pub domain: TrustDomain,
    pub level: TrustLevel,
}

impl OriginTrust {
    #[must_use]
    pub fn new(domain: TrustDomain, level: TrustLevel) -> Self {
        Self { domain, level }
    }
}

/// The raw classification triple for one rendered action.
///
/// Two assessments compare equal exactly when neither the action nor the
/// origin classification changed, which is how the execution controller
/// detects a mid-session registry update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrustAssessment {
    pub action: TrustLevel,
    /// Absent for a direct action reference with no enclosing origin.
    pub origin: Option<OriginTrust>,
}

impl TrustAssessment {
    #[must_use]
    pub fn new(action: TrustLevel, origin: Option<OriginTrust>) -> Self {
        Self { action, origin }
    }

    /// Evaluates this assessment against `policy`.
    #[must_use]
    pub fn evaluate(&self, policy: &NormalizedPolicy) -> Evaluation {
        evaluate(self.action, self.origin, policy)
    }
}

/// Verdict of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evaluation {
    /// Most restrictive of the action and origin classifications.
    pub overall: TrustLevel,
    /// Both the action check and the origin check pass.
    pub admitted: bool,
}

impl Evaluation {
    /// Whether a freshly mounted controller starts in `blocked`.
    #[must_use]
    pub fn starts_blocked(&self) -> bool {
        self.overall == TrustLevel::Malicious || !self.admitted
    }

    /// Whether the user may dismiss a block.
    ///
    /// Only the policy check counts: a malicious classification under a
    /// policy that admits it can be overridden, a policy denial cannot.
    #[must_use]
    pub fn override_permitted(&self) -> bool {
        self.admitted
    }
}

/// Merges the classifications and runs both admission checks.
///
/// # Example
///
/// ```
/// use actgate_security::{evaluate, NormalizedPolicy, SecurityPolicy};
/// use actgate_types::TrustLevel;
///
/// let policy = NormalizedPolicy::uniform(SecurityPolicy::All);
/// let verdict = evaluate(TrustLevel::Malicious, None, &policy);
/// assert!(verdict.admitted);
/// assert!(verdict.starts_blocked());
/// assert!(verdict.override_permitted());
/// ```
#[must_use]
pub fn evaluate(
    action: TrustLevel,
    origin: Option<OriginTrust>,
    policy: &NormalizedPolicy,
) -> Evaluation {
    let overall = merge(action, origin.map(|o| o.level));
    let action_ok = admits(action, policy.actions());
    let origin_ok = origin.map_or(true, |o| admits(o.level, policy.for_domain(o.domain)));
    let admitted = action_ok && origin_ok;

    if admitted {
        tracing::debug!(
            action = %action,
            origin = ?origin,
            overall = %overall,
            "admission granted"
        );
    } else {
        tracing::warn!(
            action = %action,
            origin = ?origin,
            overall = %overall,
            action_ok,
            origin_ok,
            "admission denied by policy"
        );
    }

    Evaluation { overall, admitted }
}
