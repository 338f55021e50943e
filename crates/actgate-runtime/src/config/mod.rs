//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────────┐
//! │  1. Environment Variables (ACTGATE_*)        │  Runtime override
//! ├──────────────────────────────────────────────┤
//! │  2. Project Config (.actgate/config.toml)    │  Project-specific
//! ├──────────────────────────────────────────────┤
//! │  3. Global Config (~/.actgate/config.toml)   │  User defaults
//! ├──────────────────────────────────────────────┤
//! │  4. Default Values (compile-time)            │  Fallback
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `ACTGATE_SECURITY` | `security.policy` | `only-trusted` \| `non-malicious` \| `all` |
//! | `ACTGATE_REGISTRY_URL` | `registry.url` | String |
//! | `ACTGATE_REFRESH_SECS` | `registry.refresh_interval_secs` | u64 |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.actgate/config.toml
//! [security]
//! policy = "only-trusted"
//!
//! [registry]
//! url = "https://actions-registry.dial.to/all"
//! refresh_interval_secs = 600
//! fetch_timeout_secs = 10
//!
//! [limits]
//! max_buttons = 10
//! max_inputs = 3
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{
    ConfigLayer, GateConfig, Limits, LimitsLayer, RegistryConfig, RegistryLayer, SecurityConfig,
    SecurityLayer,
};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(PROJECT_CONFIG_DIR)
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join(PROJECT_CONFIG_FILE)
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".actgate";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
