//! Keyglot settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from configuration files and environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::resolver::format::{ArgFormat, ClassPrefix};
use crate::resolver::policy::SuppressionSetting;
use crate::utils::errors::Result;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Resolution behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Placeholder template for unresolved keys, containing `{0}` once
    pub escape_template: String,
    /// Key segment holding include directives
    pub include_tag: String,
    /// `true`/`false` or a list of error category names
    pub suppress_errors: SuppressionSetting,
    pub class_prefix: ClassPrefix,
    pub arg_format: ArgFormat,
    /// Whether lookups fall back to broader locales
    pub fallback: bool,
    /// Last locale of every fallback chain; the root when unset
    pub terminal_locale: Option<String>,
}

/// Store backend selection
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name of a backend registered in the store registry
    pub backend: String,
    pub base_dir: String,
    pub base_name: String,
    /// Wrap every store in a timed cache when set
    pub cache_ttl_seconds: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            escape_template: "???{0}???".to_string(),
            include_tag: "@include".to_string(),
            suppress_errors: SuppressionSetting::default(),
            class_prefix: ClassPrefix::default(),
            arg_format: ArgFormat::default(),
            fallback: true,
            terminal_locale: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "json".to_string(),
            base_dir: "locales".to_string(),
            base_name: "messages".to_string(),
            cache_ttl_seconds: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional `keyglot` file and `KEYGLOT_*` variables
    ///
    /// Nested keys use `__`, e.g. `KEYGLOT_RESOLVER__ESCAPE_TEMPLATE`.
    pub fn new() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("keyglot").required(false))
            .add_source(
                config::Environment::with_prefix("KEYGLOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load settings from a single configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        super::validation::validate_settings(self)
    }
}
