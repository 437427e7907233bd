//! Configuration validation module
//!
//! This module provides validation functions for configuration so that
//! every problem surfaces at construction time rather than on first lookup.

use super::{LoggingConfig, ResolverConfig, Settings, StoreConfig};
use crate::locale::LocaleId;
use crate::resolver::format::PLACEHOLDER_MARKER;
use crate::resolver::policy::ErrorPolicy;
use crate::utils::errors::{KeyglotError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_resolver_config(&settings.resolver)?;
    validate_store_config(&settings.store)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate an escape template
///
/// The template must contain the `{0}` marker exactly once and must not
/// contain it in quoted (`'{0}'`) or doubled (`{{0}}`) form.
pub fn validate_escape_template(template: &str) -> Result<()> {
    let occurrences = template.matches(PLACEHOLDER_MARKER).count();
    if occurrences != 1 {
        return Err(KeyglotError::Config(format!(
            "Escape template '{}' must contain '{}' exactly once, found {}",
            template, PLACEHOLDER_MARKER, occurrences
        )));
    }

    for escaped in ["'{0}'", "{{0}}"] {
        if template.contains(escaped) {
            return Err(KeyglotError::Config(format!(
                "Escape template '{}' contains the escaped marker '{}'",
                template, escaped
            )));
        }
    }

    Ok(())
}

/// Validate the include directive tag
pub fn validate_include_tag(tag: &str) -> Result<()> {
    if tag.trim().is_empty() {
        return Err(KeyglotError::Config("Include tag is required".to_string()));
    }

    if tag.contains('.') || tag.contains(';') {
        return Err(KeyglotError::Config(format!(
            "Include tag '{}' must not contain '.' or ';'",
            tag
        )));
    }

    Ok(())
}

/// Validate resolver configuration
fn validate_resolver_config(config: &ResolverConfig) -> Result<()> {
    validate_escape_template(&config.escape_template)?;
    validate_include_tag(&config.include_tag)?;
    ErrorPolicy::from_setting(&config.suppress_errors)?;

    if let Some(terminal) = &config.terminal_locale {
        LocaleId::parse(terminal).map_err(|e| {
            KeyglotError::Config(format!("Invalid terminal locale '{}': {}", terminal, e))
        })?;
    }

    Ok(())
}

/// Validate store configuration
fn validate_store_config(config: &StoreConfig) -> Result<()> {
    if config.backend.trim().is_empty() {
        return Err(KeyglotError::Config("Store backend is required".to_string()));
    }

    if config.base_name.trim().is_empty() {
        return Err(KeyglotError::Config(
            "Store base name is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(KeyglotError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(KeyglotError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}
