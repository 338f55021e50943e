//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use crate::action::HttpActionTransport;
use crate::registry::{
    HttpRegistrySource, DEFAULT_FETCH_TIMEOUT, DEFAULT_REFRESH_INTERVAL, DEFAULT_REGISTRY_URL,
};
use actgate_security::{NormalizedPolicy, PolicyConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure.
///
/// This is the unified configuration after applying all layers.
///
/// # Example
///
/// ```
/// use actgate_runtime::config::GateConfig;
/// use actgate_security::SecurityPolicy;
///
/// let config = GateConfig::default();
/// assert_eq!(config.policy().actions(), SecurityPolicy::OnlyTrusted);
/// assert_eq!(config.limits.max_buttons, 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    pub security: SecurityConfig,

    pub registry: RegistryConfig,

    pub limits: Limits,
}

impl GateConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// The configured policy in three-key form.
    #[must_use]
    pub fn policy(&self) -> NormalizedPolicy {
        self.security.policy.normalize()
    }

    /// Applies the keys `layer` sets on top of this config.
    ///
    /// A key present in the layer always wins, including when it holds
    /// the default value. A policy replaces the previous one wholesale.
    pub fn apply(&mut self, layer: &ConfigLayer) {
        if let Some(policy) = layer.security.policy {
            self.security.policy = policy;
        }

        let registry = &layer.registry;
        if let Some(url) = &registry.url {
            self.registry.url.clone_from(url);
        }
        if let Some(secs) = registry.refresh_interval_secs {
            self.registry.refresh_interval_secs = secs;
        }
        if let Some(secs) = registry.fetch_timeout_secs {
            self.registry.fetch_timeout_secs = secs;
        }

        if let Some(max) = layer.limits.max_buttons {
            self.limits.max_buttons = max;
        }
        if let Some(max) = layer.limits.max_inputs {
            self.limits.max_inputs = max;
        }
    }
}

/// Admission policy.
///
/// ```toml
/// [security]
/// policy = "non-malicious"
///
/// # or, per domain (missing domains are only-trusted)
/// [security.policy]
/// websites = "non-malicious"
/// interstitials = "non-malicious"
/// actions = "only-trusted"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    pub policy: PolicyConfig,
}

/// Trust registry source, refresh schedule and network timeout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    pub url: String,

    /// Seconds between scheduled refreshes.
    pub refresh_interval_secs: u64,

    /// Timeout in seconds for registry fetches and action endpoint requests.
    pub fetch_timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.into(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL.as_secs(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl RegistryConfig {
    /// Refresh interval, never shorter than one second.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Builds the HTTP source described by this section.
    #[must_use]
    pub fn source(&self) -> HttpRegistrySource {
        HttpRegistrySource::new(self.url.clone()).with_timeout(self.fetch_timeout())
    }

    /// Builds the action endpoint transport with this section's timeout.
    #[must_use]
    pub fn action_transport(&self) -> HttpActionTransport {
        HttpActionTransport::new().with_timeout(self.fetch_timeout())
    }
}

/// Soft caps on how many components are offered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Limits {
    /// Parameterless components.
    pub max_buttons: usize,

    /// Single-parameter components.
    pub max_inputs: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_buttons: 10,
            max_inputs: 3,
        }
    }
}

/// One configuration file as written: only the keys it sets.
///
/// Layers are applied in order with [`GateConfig::apply`]. Unlike
/// [`GateConfig`], an absent key is distinguishable from a key set to
/// its default, so a later layer can restore a stricter default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigLayer {
    pub security: SecurityLayer,
    pub registry: RegistryLayer,
    pub limits: LimitsLayer,
}

impl ConfigLayer {
    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityLayer {
    pub policy: Option<PolicyConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryLayer {
    pub url: Option<String>,
    pub refresh_interval_secs: Option<u64>,
    pub fetch_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LimitsLayer {
    pub max_buttons: Option<usize>,
    pub max_inputs: Option<usize>,
}
