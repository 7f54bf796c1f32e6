//! Client configuration.
//!
//! Layered as defaults, then an optional `forge.toml`, then environment
//! variables.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigResult;

/// File looked up in the workspace root by [`ClientConfig::load`].
pub const CONFIG_FILE_NAME: &str = "forge.toml";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PROTOTYPE_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_PROTOTYPE_TEMPERATURE: f32 = 0.2;

/// Environment variables holding the API key, in lookup order.
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Configuration for [`crate::client::ForgeClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API key; never written back out
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub analysis_model: String,
    pub level_model: String,
    pub prototype_model: String,
    pub prototype_temperature: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: DEFAULT_TEXT_MODEL.to_string(),
            level_model: DEFAULT_TEXT_MODEL.to_string(),
            prototype_model: DEFAULT_PROTOTYPE_MODEL.to_string(),
            prototype_temperature: DEFAULT_PROTOTYPE_TEMPERATURE,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Read a TOML config file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Self = toml::from_str(&content)?;
        config.api_key = config.api_key.filter(|k| !k.is_empty());
        Ok(config)
    }

    /// Defaults, then `<root>/forge.toml` if present, then the environment.
    pub fn load(workspace_root: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = workspace_root.as_ref().join(CONFIG_FILE_NAME);
        let config = if path.exists() {
            debug!(path = %path.display(), "Loading client config");
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        Ok(config.apply_env())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`. Empty values count as unset.
    ///
    /// - `GEMINI_API_KEY`, then `API_KEY`: the API key
    /// - `FORGE_MODEL`: model for all three operations
    /// - `FORGE_BASE_URL`: API base URL
    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(key) = API_KEY_VARS.iter().find_map(|name| get(*name)) {
            self.api_key = Some(key);
        }
        if let Some(model) = get("FORGE_MODEL") {
            self = self.with_model(model);
        }
        if let Some(base_url) = get("FORGE_BASE_URL") {
            self.base_url = base_url;
        }
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Use one model for every operation.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.analysis_model = model.clone();
        self.level_model = model.clone();
        self.prototype_model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.prototype_temperature = temperature;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().map_or(false, |k| !k.is_empty())
    }
}
