use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Environment/option key overriding [`ThemerConfig::default_directory`].
pub const DEFAULT_DIRECTORY_KEY: &str = "THEMER_DEFAULT_DIRECTORY";
/// Environment/option key overriding [`ThemerConfig::static_url_prefix`].
pub const STATIC_URL_PREFIX_KEY: &str = "THEMER_STATIC_URL_PREFIX";

/// Application configuration as read from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory (relative to the application root) holding non-themed templates.
    #[serde(default = "default_template_folder")]
    pub template_folder: String,

    #[serde(default)]
    pub themer: ThemerConfig,
}

fn default_template_folder() -> String {
    "templates".to_string()
}

/// Theming options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemerConfig {
    /// Directory (relative to the application root) scanned for themes when
    /// no loaders are given explicitly.
    #[serde(default = "default_directory")]
    pub default_directory: String,

    /// URL prefix under which the host serves theme assets.
    #[serde(default = "default_static_url_prefix")]
    pub static_url_prefix: String,
}

fn default_directory() -> String {
    "themes".to_string()
}

fn default_static_url_prefix() -> String {
    "/_theme".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            template_folder: default_template_folder(),
            themer: ThemerConfig::default(),
        }
    }
}

impl Default for ThemerConfig {
    fn default() -> Self {
        Self {
            default_directory: default_directory(),
            static_url_prefix: default_static_url_prefix(),
        }
    }
}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: AppConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_relative_dir("template_folder", &self.template_folder)?;
        self.themer.validate()
    }
}

impl ThemerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_relative_dir("default_directory", &self.default_directory)?;

        if self.static_url_prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "static_url_prefix cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply `THEMER_*` overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DEFAULT_DIRECTORY_KEY) {
            tracing::debug!("{} overrides default_directory: {}", DEFAULT_DIRECTORY_KEY, dir);
            self.default_directory = dir;
        }
        if let Some(prefix) = lookup(STATIC_URL_PREFIX_KEY) {
            tracing::debug!(
                "{} overrides static_url_prefix: {}",
                STATIC_URL_PREFIX_KEY,
                prefix
            );
            self.static_url_prefix = prefix;
        }
    }

    /// Apply `THEMER_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }
}

fn validate_relative_dir(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }

    let escapes = Path::new(value)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ConfigError::ValidationError(format!(
            "{} must be a relative path inside the application root, got {:?}",
            field, value
        )));
    }

    Ok(())
}
