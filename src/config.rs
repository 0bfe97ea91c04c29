//! Configuration loader
//!
//! Loads the model management settings from YAML, with environment overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Env var naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "MODEL_MANAGEMENT_CONFIG";

/// Env var overriding the preferred (user) language.
pub const LANGUAGE_ENV: &str = "MODEL_MANAGEMENT_LANGUAGE";

const DEFAULT_CONFIG_PATH: &str = "config/model-management.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelManagementConfig {
    /// Language configured for the whole system.
    pub system_language: String,
    /// Language of the current user, preferred over the system language.
    pub user_language: Option<String>,
    /// Last language tried before falling back to any available value.
    pub fallback_language: String,
    /// Log skipped attributes (no metadata) at warn instead of debug.
    pub strict_metadata: bool,
    /// Maximum number of undoable actions kept in history.
    pub history_limit: Option<usize>,
}

impl Default for ModelManagementConfig {
    fn default() -> Self {
        Self {
            system_language: "en".to_string(),
            user_language: None,
            fallback_language: "en".to_string(),
            strict_metadata: false,
            history_limit: None,
        }
    }
}

impl ModelManagementConfig {
    /// Parse a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse model management config")
    }

    /// Ordered, de-duplicated, lowercase language preference chain:
    /// user → system → fallback.
    pub fn language_chain(&self) -> Vec<String> {
        let mut chain: Vec<String> = Vec::with_capacity(3);
        let candidates = [
            self.user_language.as_deref(),
            Some(self.system_language.as_str()),
            Some(self.fallback_language.as_str()),
        ];
        for lang in candidates.into_iter().flatten() {
            let lang = lang.trim().to_lowercase();
            if !lang.is_empty() && !chain.contains(&lang) {
                chain.push(lang);
            }
        }
        chain
    }
}

pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Resolve the config file from the environment.
    ///
    /// Path resolution order:
    /// 1. MODEL_MANAGEMENT_CONFIG environment variable (explicit override)
    /// 2. Relative "config/model-management.yaml"
    /// 3. None: defaults are used
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::new(path);
        }

        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::new(DEFAULT_CONFIG_PATH);
        }

        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load the configuration, applying the language env override.
    pub fn load(&self) -> Result<ModelManagementConfig> {
        let mut config = match &self.path {
            Some(path) => {
                info!("Loading model management config from {}", path.display());
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                ModelManagementConfig::from_yaml(&content)
                    .with_context(|| format!("Invalid config in {}", path.display()))?
            }
            None => {
                debug!("No model management config file found, using defaults");
                ModelManagementConfig::default()
            }
        };

        if let Ok(lang) = std::env::var(LANGUAGE_ENV) {
            if !lang.trim().is_empty() {
                config.user_language = Some(lang);
            }
        }

        Ok(config)
    }
}
