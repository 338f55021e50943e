//! Trust vocabulary.
//!
//! [`TrustLevel`] is the three-tier classification assigned by the trust
//! registry. [`TrustDomain`] names which registry table a classification
//! comes from (and therefore which policy governs it).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Trust classification of an action or of the site hosting it.
///
/// Levels are totally ordered by restrictiveness:
///
/// ```text
/// trusted < unknown < malicious
/// ```
///
/// Merging two levels always keeps the more restrictive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    /// Registered and verified.
    Trusted,
    /// Not present in the registry.
    Unknown,
    /// Flagged as unsafe.
    Malicious,
}

impl TrustLevel {
    /// Position in the restrictiveness order (higher is more restrictive).
    #[must_use]
    pub fn severity(self) -> u8 {
        match self {
            Self::Trusted => 0,
            Self::Unknown => 1,
            Self::Malicious => 2,
        }
    }

    /// Returns `true` if `self` is strictly more restrictive than `other`.
    #[must_use]
    pub fn is_more_restrictive_than(self, other: Self) -> bool {
        self.severity() > other.severity()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trusted => "trusted",
            Self::Unknown => "unknown",
            Self::Malicious => "malicious",
        }
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`TrustLevel`] or [`TrustDomain`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTrustError {
    kind: &'static str,
    input: String,
}

impl std::fmt::Display for ParseTrustError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: '{}'", self.kind, self.input)
    }
}

impl std::error::Error for ParseTrustError {}

impl FromStr for TrustLevel {
    type Err = ParseTrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "trusted" => Ok(Self::Trusted),
            "unknown" => Ok(Self::Unknown),
            "malicious" => Ok(Self::Malicious),
            other => Err(ParseTrustError {
                kind: "trust level",
                input: other.to_string(),
            }),
        }
    }
}

/// Registry table a classification belongs to.
///
/// Each domain carries its own security policy once the configured policy
/// has been normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustDomain {
    /// Sites that embed action links.
    Websites,
    /// Wrapper URLs that must be decoded to reach the action endpoint.
    Interstitials,
    /// Action endpoints themselves.
    Actions,
}

impl TrustDomain {
    /// All domains, in registry document order.
    pub const ALL: [TrustDomain; 3] = [Self::Actions, Self::Websites, Self::Interstitials];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Websites => "websites",
            Self::Interstitials => "interstitials",
            Self::Actions => "actions",
        }
    }
}

impl std::fmt::Display for TrustDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrustDomain {
    type Err = ParseTrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "websites" => Ok(Self::Websites),
            "interstitials" => Ok(Self::Interstitials),
            "actions" => Ok(Self::Actions),
            other => Err(ParseTrustError {
                kind: "trust domain",
                input: other.to_string(),
            }),
        }
    }
}
