use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::model::store::validate_name;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub lint: LintConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Remote lint/execute service location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix shared by all endpoints
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Per-request timeout enforced by the HTTP client
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_timeout_ms() -> u64 {
    15_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintConfig {
    /// Quiet period after the last edit before a lint request goes out
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Document name suffixes that are linted
    #[serde(default = "default_lint_suffixes")]
    pub suffixes: Vec<String>,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_lint_suffixes() -> Vec<String> {
    vec![".py".to_string()]
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            suffixes: default_lint_suffixes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Document seeded on first run
    #[serde(default = "default_document")]
    pub default_document: String,

    /// Prefix for auto-named tabs ("Tab 1", "Tab 2", ...)
    #[serde(default = "default_new_tab_prefix")]
    pub new_tab_prefix: String,

    #[serde(default = "default_true")]
    pub auto_save: bool,
}

fn default_document() -> String {
    "Model.py".to_string()
}

fn default_new_tab_prefix() -> String {
    "Tab".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_document: default_document(),
            new_tab_prefix: default_new_tab_prefix(),
            auto_save: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Leading part of the archive folder name
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_app_name() -> String {
    "playground".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "service.base_url cannot be empty".to_string(),
            ));
        }

        if self.lint.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "lint.debounce_ms must be greater than 0".to_string(),
            ));
        }

        for suffix in &self.lint.suffixes {
            if !suffix.starts_with('.') || suffix.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "lint suffix {suffix:?} must look like \".py\""
                )));
            }
        }

        validate_name(&self.session.default_document)
            .map_err(|e| ConfigError::Validation(format!("session.default_document: {e}")))?;

        if self.session.new_tab_prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "session.new_tab_prefix cannot be empty".to_string(),
            ));
        }

        if self.export.app_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.app_name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
    #[error("Validation error: {0}")]
    Validation(String),
}
