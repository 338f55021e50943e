//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.actgate/config.toml`)
//! 3. Project config (`.actgate/config.toml`)
//! 4. Environment variables (`ACTGATE_*`)
//!
//! Each layer overrides the keys it actually sets. A key written with its
//! default value still overrides, so a project can tighten a policy that
//! the global config loosened.

use super::{
    default_config_path, ConfigError, ConfigLayer, GateConfig, PROJECT_CONFIG_DIR,
    PROJECT_CONFIG_FILE,
};
use actgate_security::SecurityPolicy;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use actgate_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/project")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), actgate_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.actgate/config.toml).
    global_config_path: Option<PathBuf>,

    project_root: Option<PathBuf>,

    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Project config will be loaded from `<project_root>/.actgate/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any config file exists but cannot be parsed,
    /// or an environment variable holds an invalid value.
    /// Missing config files are silently ignored.
    pub fn load(&self) -> Result<GateConfig, ConfigError> {
        let mut config = GateConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global) = load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.apply(&global);
            }
        }

        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let path = project_root.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILE);
                if let Some(project) = load_file(&path)? {
                    debug!(
                        path = %path.display(),
                        project = %project_root.display(),
                        "Loaded project config"
                    );
                    config.apply(&project);
                }
            }
        }

        if !self.skip_env {
            apply_env_vars(&mut config)?;
        }

        Ok(config)
    }
}

/// Loads a config file, returning None if it doesn't exist.
fn load_file(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let layer = ConfigLayer::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;
    Ok(Some(layer))
}

fn apply_env_vars(config: &mut GateConfig) -> Result<(), ConfigError> {
    if let Ok(val) = std::env::var("ACTGATE_SECURITY") {
        let policy: SecurityPolicy = val
            .parse()
            .map_err(|e: actgate_security::PolicyParseError| {
                ConfigError::invalid_env_var("ACTGATE_SECURITY", e.to_string())
            })?;
        config.security.policy = policy.into();
    }

    if let Ok(val) = std::env::var("ACTGATE_REGISTRY_URL") {
        config.registry.url = val;
    }

    if let Ok(val) = std::env::var("ACTGATE_REFRESH_SECS") {
        config.registry.refresh_interval_secs = val
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_env_var("ACTGATE_REFRESH_SECS", "expected seconds"))?;
    }

    Ok(())
}
