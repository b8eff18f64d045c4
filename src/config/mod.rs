//! Management configuration.
//!
//! A small TOML file selects the preset, the key scheme and the system scope
//! policy used to build the root [`DependencyManager`]. Every field is
//! optional; an absent file means the `default` preset with the legacy scope
//! policy.
//!
//! # File Format
//!
//! ```toml
//! preset = "transitive"      # default | transitive | classic
//! apply_from = 1             # optional override of the preset's threshold
//! # derive_until = 3         # optional override, unbounded when absent
//! key = "group-artifact"     # full | group-artifact
//!
//! [system_scope]
//! labels = ["system", "host"]
//! path_property = "localPath"
//! ```
//!
//! # Location
//!
//! The CLI reads the file given by `--config`, falling back to the
//! `DEPMGR_CONFIG` environment variable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::{CONFIG_ENV_VAR, LOCAL_PATH_PROPERTY, SYSTEM_SCOPE};
use crate::core::DepmgrError;
use crate::management::{DependencyManager, KeyScheme, ManagementPreset};
use crate::scope::{LabelSetScopeHandler, LegacySystemScopeHandler, SystemScopeHandler};

/// Settings used to build the root management snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagementConfig {
    /// Preset name; `default` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Override of the preset's `derive_until`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derive_until: Option<usize>,

    /// Override of the preset's `apply_from`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_from: Option<usize>,

    /// Coordinate fields used for matching.
    #[serde(default)]
    pub key: KeyScheme,

    /// System scope policy.
    #[serde(default)]
    pub system_scope: SystemScopeConfig,
}

/// Which scope labels are system scope and where the path is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemScopeConfig {
    /// Labels classified as system scope.
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    /// Artifact property holding the local path.
    #[serde(default = "default_path_property")]
    pub path_property: String,
}

fn default_labels() -> Vec<String> {
    vec![SYSTEM_SCOPE.to_string()]
}

fn default_path_property() -> String {
    LOCAL_PATH_PROPERTY.to_string()
}

impl Default for SystemScopeConfig {
    fn default() -> Self {
        Self {
            labels: default_labels(),
            path_property: default_path_property(),
        }
    }
}

impl SystemScopeConfig {
    /// Whether this is exactly the legacy policy.
    pub fn is_legacy(&self) -> bool {
        self.labels == default_labels() && self.path_property == LOCAL_PATH_PROPERTY
    }

    /// Build the configured scope handler.
    ///
    /// # Errors
    ///
    /// Returns [`DepmgrError::ConfigError`] when no label or an empty
    /// property key is configured.
    pub fn build_handler(&self) -> Result<Arc<dyn SystemScopeHandler>, DepmgrError> {
        if self.labels.is_empty() || self.labels.iter().any(String::is_empty) {
            return Err(DepmgrError::ConfigError {
                message: "system_scope.labels must contain at least one non-empty label".to_string(),
            });
        }
        if self.path_property.is_empty() {
            return Err(DepmgrError::ConfigError {
                message: "system_scope.path_property must not be empty".to_string(),
            });
        }

        if self.is_legacy() {
            return Ok(LegacySystemScopeHandler::shared());
        }
        Ok(Arc::new(LabelSetScopeHandler::new(self.labels.iter().cloned(), self.path_property.clone())))
    }
}

impl ManagementConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid TOML or unknown fields.
    pub fn from_toml(content: &str) -> Result<Self, DepmgrError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(DepmgrError::from)
            .with_context(|| format!("Failed to read management config from {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse management config from {}", path.display()))
    }

    /// Load from `path`, else from `DEPMGR_CONFIG`, else use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file cannot be read or parsed.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = path.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        match path {
            Some(path) => {
                tracing::debug!("Loading management config from {}", path.display());
                Self::load_from(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// The effective preset, threshold overrides included.
    ///
    /// # Errors
    ///
    /// Returns [`DepmgrError::InvalidPreset`] for unknown preset names.
    pub fn preset(&self) -> Result<ManagementPreset, DepmgrError> {
        let base = match &self.preset {
            Some(name) => name.parse()?,
            None => ManagementPreset::default(),
        };
        Ok(base.with_overrides(self.derive_until, self.apply_from))
    }

    /// Build the root snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown presets or an invalid scope policy.
    pub fn build_manager(&self) -> Result<DependencyManager, DepmgrError> {
        let preset = self.preset()?;
        let handler = self.system_scope.build_handler()?;
        tracing::debug!("Building management root with preset {} and {:?} keys", preset, self.key);
        Ok(DependencyManager::new(preset, handler).with_key_scheme(self.key))
    }
}
