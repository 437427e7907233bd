//! Error handling for keyglot
//!
//! This module defines the error type returned by every fallible operation
//! in the crate, together with the category taxonomy that the suppression
//! policy works on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for keyglot
#[derive(Error, Debug)]
pub enum KeyglotError {
    #[error("Missing translation for key '{key}' in locale '{locale}'")]
    MissingTranslation { key: String, locale: String },

    #[error("Include loop detected: prefix '{prefix}' was already visited")]
    IncludeLoopDetected { prefix: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to format value of key '{key}': {cause}")]
    Format { key: String, cause: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to construct store for locale '{locale}': {reason}")]
    Backend { locale: String, reason: String },

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for keyglot operations
pub type Result<T> = std::result::Result<T, KeyglotError>;

/// Error categories the suppression policy understands.
///
/// `All` and `None` are aggregates: they never describe a concrete failure
/// and may only appear alone in a suppression set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    MissingTranslation,
    IncludeLoopDetected,
    InvalidParameter,
    FormatError,
    All,
    None,
}

impl ErrorCategory {
    /// Whether this category is one of the `All`/`None` aggregates
    pub fn is_aggregate(self) -> bool {
        matches!(self, ErrorCategory::All | ErrorCategory::None)
    }

    /// Whether a policy may suppress failures of this category
    pub fn is_suppressible(self) -> bool {
        matches!(
            self,
            ErrorCategory::MissingTranslation
                | ErrorCategory::IncludeLoopDetected
                | ErrorCategory::InvalidParameter
        )
    }

    /// Stable name used in configuration files
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::MissingTranslation => "missing_translation",
            ErrorCategory::IncludeLoopDetected => "include_loop_detected",
            ErrorCategory::InvalidParameter => "invalid_parameter",
            ErrorCategory::FormatError => "format_error",
            ErrorCategory::All => "all",
            ErrorCategory::None => "none",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCategory {
    type Err = KeyglotError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "missing_translation" => Ok(ErrorCategory::MissingTranslation),
            "include_loop_detected" | "include_loop" => Ok(ErrorCategory::IncludeLoopDetected),
            "invalid_parameter" => Ok(ErrorCategory::InvalidParameter),
            "format_error" => Ok(ErrorCategory::FormatError),
            "all" => Ok(ErrorCategory::All),
            "none" => Ok(ErrorCategory::None),
            _ => Err(KeyglotError::Config(format!(
                "Unknown error category: '{}'",
                s
            ))),
        }
    }
}

impl KeyglotError {
    /// Map the error onto its suppression category, if it has one
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            KeyglotError::MissingTranslation { .. } => Some(ErrorCategory::MissingTranslation),
            KeyglotError::IncludeLoopDetected { .. } => Some(ErrorCategory::IncludeLoopDetected),
            KeyglotError::InvalidParameter(_) => Some(ErrorCategory::InvalidParameter),
            KeyglotError::Format { .. } => Some(ErrorCategory::FormatError),
            _ => None,
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            KeyglotError::MissingTranslation { .. } => "missing_translation",
            KeyglotError::IncludeLoopDetected { .. } => "include_loop",
            KeyglotError::InvalidParameter(_) => "invalid_parameter",
            KeyglotError::Format { .. } => "format_error",
            KeyglotError::Config(_) | KeyglotError::Settings(_) => "config_error",
            KeyglotError::Backend { .. } => "backend_error",
            KeyglotError::Io(_) => "io_error",
            KeyglotError::Json(_) | KeyglotError::Toml(_) => "parse_error",
        }
    }

    /// Check if a policy is allowed to turn this error into a placeholder
    pub fn is_suppressible(&self) -> bool {
        self.category().map_or(false, ErrorCategory::is_suppressible)
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            KeyglotError::Config(_) => ErrorSeverity::Critical,
            KeyglotError::Settings(_) => ErrorSeverity::Critical,
            KeyglotError::Backend { .. } => ErrorSeverity::Critical,
            KeyglotError::MissingTranslation { .. } => ErrorSeverity::Warning,
            KeyglotError::IncludeLoopDetected { .. } => ErrorSeverity::Warning,
            KeyglotError::InvalidParameter(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        let missing = KeyglotError::MissingTranslation {
            key: "a.b".to_string(),
            locale: "de".to_string(),
        };
        assert_eq!(missing.category(), Some(ErrorCategory::MissingTranslation));
        assert!(missing.is_suppressible());

        let format = KeyglotError::Format {
            key: "a".to_string(),
            cause: "bad".to_string(),
        };
        assert_eq!(format.category(), Some(ErrorCategory::FormatError));
        assert!(!format.is_suppressible());

        let config = KeyglotError::Config("broken".to_string());
        assert_eq!(config.category(), None);
        assert!(!config.is_suppressible());
    }

    #[test]
    fn test_messages_carry_payload() {
        let missing = KeyglotError::MissingTranslation {
            key: "Customer.name".to_string(),
            locale: "de_DE".to_string(),
        };
        let message = missing.to_string();
        assert!(message.contains("Customer.name"));
        assert!(message.contains("de_DE"));

        let looped = KeyglotError::IncludeLoopDetected {
            prefix: "Cycle2".to_string(),
        };
        assert!(looped.to_string().contains("Cycle2"));
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            KeyglotError::InvalidParameter("x".to_string()).code(),
            "invalid_parameter"
        );
        assert_eq!(
            KeyglotError::IncludeLoopDetected { prefix: "p".to_string() }.code(),
            "include_loop"
        );
        assert_eq!(
            KeyglotError::Backend {
                locale: "de".to_string(),
                reason: "gone".to_string()
            }
            .code(),
            "backend_error"
        );
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "missing_translation".parse::<ErrorCategory>().unwrap(),
            ErrorCategory::MissingTranslation
        );
        assert_eq!(
            "Include-Loop".parse::<ErrorCategory>().unwrap(),
            ErrorCategory::IncludeLoopDetected
        );
        assert_eq!("ALL".parse::<ErrorCategory>().unwrap(), ErrorCategory::All);
        assert!("sometimes".parse::<ErrorCategory>().is_err());
    }

    #[test]
    fn test_category_serde_names() {
        let parsed: Vec<ErrorCategory> =
            serde_json::from_str(r#"["invalid_parameter", "none"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![ErrorCategory::InvalidParameter, ErrorCategory::None]
        );
    }

    #[test]
    fn test_severity() {
        assert_eq!(
            KeyglotError::Config("x".to_string()).severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            KeyglotError::InvalidParameter("x".to_string()).severity(),
            ErrorSeverity::Info
        );
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }
}
