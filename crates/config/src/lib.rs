//! Configuration loading and validation for the DCL resolver.
//!
//! Loads configuration from `~/.dcl/config.toml` with environment variable
//! overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Strategy names accepted in `strategy`.
pub const STRATEGY_NAMES: &[&str] = &["structured", "concatenation", "concat", "native"];

/// Adapter kinds accepted in `provider.kind`.
pub const PROVIDER_KINDS: &[&str] = &["mock", "openai"];

/// The root configuration structure.
///
/// Maps directly to `~/.dcl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bundle directories in precedence order (earliest wins)
    #[serde(default)]
    pub bundles: Vec<PathBuf>,

    /// Name of the alias index document inside each bundle
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Assembly strategy name
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Generation adapter settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

fn default_index_file() -> String {
    "index.yaml".into()
}
fn default_strategy() -> String {
    "structured".into()
}

/// Generation adapter settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// `mock` or `openai`
    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Fixed reply for the mock adapter; when unset it echoes a frame count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_response: Option<String>,
}

fn default_kind() -> String {
    "mock".into()
}
fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            mock_response: None,
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("mock_response", &self.mock_response)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.dcl/config.toml).
    ///
    /// Environment overrides:
    /// - `DCL_API_KEY`, then `OPENAI_API_KEY` (only when no key is configured)
    /// - `DCL_MODEL`
    /// - `DCL_STRATEGY`
    /// - `DCL_BUNDLES` (platform path-list syntax, replaces configured bundles)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_dir().join("config.toml"))
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`AppConfig::load`]).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.provider.api_key.is_none() {
            self.provider.api_key = lookup("DCL_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(model) = lookup("DCL_MODEL") {
            self.provider.model = model;
        }

        if let Some(strategy) = lookup("DCL_STRATEGY") {
            self.strategy = strategy;
        }

        if let Some(bundles) = lookup("DCL_BUNDLES") {
            self.bundles = std::env::split_paths(&bundles)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".dcl")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let strategy = self.strategy.trim().to_ascii_lowercase();
        if !STRATEGY_NAMES.contains(&strategy.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown strategy '{}', expected one of: {}",
                self.strategy,
                STRATEGY_NAMES.join(", ")
            )));
        }

        if !PROVIDER_KINDS.contains(&self.provider.kind.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown provider kind '{}', expected one of: {}",
                self.provider.kind,
                PROVIDER_KINDS.join(", ")
            )));
        }

        if self.provider.temperature < 0.0 || self.provider.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.index_file.trim().is_empty() {
            return Err(ConfigError::ValidationError("index_file must not be empty".into()));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.provider.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `config` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bundles: vec![],
            index_file: default_index_file(),
            strategy: default_strategy(),
            provider: ProviderConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
