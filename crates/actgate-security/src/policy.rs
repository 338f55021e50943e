//! Security policy configuration.
//!
//! A caller configures either one [`SecurityPolicy`] for everything or a
//! separate policy per [`TrustDomain`]. Before use the configuration is
//! always expanded into a [`NormalizedPolicy`], so the gate never has to
//! care which form was supplied.
//!
//! # Example
//!
//! ```
//! use actgate_security::{PolicyConfig, SecurityPolicy};
//! use actgate_types::TrustDomain;
//!
//! let config = PolicyConfig::Uniform(SecurityPolicy::NonMalicious);
//! let policy = config.normalize();
//!
//! for domain in TrustDomain::ALL {
//!     assert_eq!(policy.for_domain(domain), SecurityPolicy::NonMalicious);
//! }
//! ```

use crate::PolicyParseError;
use actgate_types::TrustDomain;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Admission threshold.
///
/// The set is closed; every `(TrustLevel, SecurityPolicy)` pair has a
/// defined answer in [`admits`](crate::admits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityPolicy {
    /// Only `trusted` is admitted.
    #[default]
    OnlyTrusted,
    /// `trusted` and `unknown` are admitted.
    NonMalicious,
    /// Everything is admitted; nothing is ever blocked by policy.
    All,
}

impl SecurityPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnlyTrusted => "only-trusted",
            Self::NonMalicious => "non-malicious",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for SecurityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "only-trusted" => Ok(Self::OnlyTrusted),
            "non-malicious" => Ok(Self::NonMalicious),
            "all" => Ok(Self::All),
            other => Err(PolicyParseError::UnknownLevel(other.to_string())),
        }
    }
}

/// Policy as supplied by the caller.
///
/// Deserializes from either a bare string or a table:
///
/// ```toml
/// policy = "non-malicious"
///
/// # or
///
/// [policy]
/// websites = "non-malicious"
/// interstitials = "non-malicious"
/// actions = "only-trusted"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyConfig {
    /// One policy applied to all three domains.
    Uniform(SecurityPolicy),
    /// Independent policy per domain.
    PerDomain(NormalizedPolicy),
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::Uniform(SecurityPolicy::default())
    }
}

impl PolicyConfig {
    /// Expands the configuration into the three-key form.
    #[must_use]
    pub fn normalize(self) -> NormalizedPolicy {
        match self {
            Self::Uniform(policy) => NormalizedPolicy::uniform(policy),
            Self::PerDomain(policy) => policy,
        }
    }
}

impl From<SecurityPolicy> for PolicyConfig {
    fn from(policy: SecurityPolicy) -> Self {
        Self::Uniform(policy)
    }
}

/// One policy per classification domain.
///
/// Immutable once built; an execution controller keeps its own copy for
/// the lifetime of the rendered action. A table that omits a domain gets
/// the default (`only-trusted`) for it; unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizedPolicy {
    websites: SecurityPolicy,
    interstitials: SecurityPolicy,
    actions: SecurityPolicy,
}

impl NormalizedPolicy {
    #[must_use]
    pub fn new(
        websites: SecurityPolicy,
        interstitials: SecurityPolicy,
        actions: SecurityPolicy,
    ) -> Self {
        Self {
            websites,
            interstitials,
            actions,
        }
    }

    /// Applies `policy` to every domain.
    #[must_use]
    pub fn uniform(policy: SecurityPolicy) -> Self {
        Self::new(policy, policy, policy)
    }

    /// Returns the policy governing `domain`.
    #[must_use]
    pub fn for_domain(&self, domain: TrustDomain) -> SecurityPolicy {
        match domain {
            TrustDomain::Websites => self.websites,
            TrustDomain::Interstitials => self.interstitials,
            TrustDomain::Actions => self.actions,
        }
    }

    #[must_use]
    pub fn actions(&self) -> SecurityPolicy {
        self.actions
    }

    #[must_use]
    pub fn websites(&self) -> SecurityPolicy {
        self.websites
    }

    #[must_use]
    pub fn interstitials(&self) -> SecurityPolicy {
        self.interstitials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        policy: PolicyConfig,
    }

    #[test]
    fn parse_all_spellings() {
        assert_eq!("only-trusted".parse(), Ok(SecurityPolicy::OnlyTrusted));
        assert_eq!("non-malicious".parse(), Ok(SecurityPolicy::NonMalicious));
        assert_eq!("all".parse(), Ok(SecurityPolicy::All));
        assert!("ALL".parse::<SecurityPolicy>().is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for policy in [
            SecurityPolicy::OnlyTrusted,
            SecurityPolicy::NonMalicious,
            SecurityPolicy::All,
        ] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }

    #[test]
    fn default_is_only_trusted_everywhere() {
        let policy = PolicyConfig::default().normalize();
        assert_eq!(policy, NormalizedPolicy::uniform(SecurityPolicy::OnlyTrusted));
    }

    #[test]
    fn uniform_expands_to_three_keys() {
        let policy = PolicyConfig::Uniform(SecurityPolicy::All).normalize();
        assert_eq!(policy.websites(), SecurityPolicy::All);
        assert_eq!(policy.interstitials(), SecurityPolicy::All);
        assert_eq!(policy.actions(), SecurityPolicy::All);
    }

    #[test]
    fn per_domain_is_kept_as_is() {
        let explicit = NormalizedPolicy::new(
            SecurityPolicy::NonMalicious,
            SecurityPolicy::All,
            SecurityPolicy::OnlyTrusted,
        );
        let policy = PolicyConfig::PerDomain(explicit).normalize();
        assert_eq!(policy.for_domain(TrustDomain::Websites), SecurityPolicy::NonMalicious);
        assert_eq!(policy.for_domain(TrustDomain::Interstitials), SecurityPolicy::All);
        assert_eq!(policy.for_domain(TrustDomain::Actions), SecurityPolicy::OnlyTrusted);
    }

    #[test]
    fn deserialize_string_form() {
        let w: Wrapper = toml::from_str(r#"policy = "non-malicious""#).unwrap();
        assert_eq!(w.policy, PolicyConfig::Uniform(SecurityPolicy::NonMalicious));
    }

    #[test]
    fn deserialize_table_form() {
        let w: Wrapper = toml::from_str(
            r#"
[policy]
websites = "all"
interstitials = "non-malicious"
actions = "only-trusted"
"#,
        )
        .unwrap();
        let policy = w.policy.normalize();
        assert_eq!(policy.websites(), SecurityPolicy::All);
        assert_eq!(policy.interstitials(), SecurityPolicy::NonMalicious);
        assert_eq!(policy.actions(), SecurityPolicy::OnlyTrusted);
    }

    #[test]
    fn deserialize_rejects_unknown_spelling() {
        let result: Result<Wrapper, _> = serde_json::from_str(r#"{"policy":"lenient"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn partial_table_defaults_missing_domains() {
        let w: Wrapper = toml::from_str("[policy]\nwebsites = \"all\"\n").unwrap();
        assert_eq!(
            w.policy.normalize(),
            NormalizedPolicy::new(
                SecurityPolicy::All,
                SecurityPolicy::OnlyTrusted,
                SecurityPolicy::OnlyTrusted
            )
        );
    }

    #[test]
    fn misspelled_domain_is_rejected() {
        let result: Result<Wrapper, _> = toml::from_str("[policy]\nwebsties = \"all\"\n");
        assert!(result.is_err());
    }
}
