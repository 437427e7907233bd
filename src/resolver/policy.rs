//! Error suppression policy
//!
//! A policy is an immutable set of suppressed error categories. Suppression
//! decisions are made here and nowhere else; stores and resolvers only
//! report failures.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::locale::LocaleId;
use crate::utils::errors::{ErrorCategory, KeyglotError, Result};
use crate::utils::logging;

/// How suppression is written in configuration files
///
/// The category list is the canonical form; the boolean flag is kept for
/// compatibility (`true` suppresses everything, `false` nothing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuppressionSetting {
    Flag(bool),
    Categories(Vec<ErrorCategory>),
}

impl Default for SuppressionSetting {
    fn default() -> Self {
        SuppressionSetting::Categories(Vec::new())
    }
}

/// Validated set of suppressed error categories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPolicy {
    suppressed: BTreeSet<ErrorCategory>,
}

impl ErrorPolicy {
    /// Build a policy, rejecting sets that mix `All`/`None` with other
    /// categories or that name a category which can never be suppressed
    pub fn new(categories: impl IntoIterator<Item = ErrorCategory>) -> Result<Self> {
        let suppressed: BTreeSet<ErrorCategory> = categories.into_iter().collect();

        for aggregate in [ErrorCategory::All, ErrorCategory::None] {
            if suppressed.contains(&aggregate) && suppressed.len() > 1 {
                return Err(KeyglotError::Config(format!(
                    "Error category '{}' cannot be combined with other categories: {:?}",
                    aggregate, suppressed
                )));
            }
        }

        if let Some(category) = suppressed
            .iter()
            .find(|category| !category.is_aggregate() && !category.is_suppressible())
        {
            return Err(KeyglotError::Config(format!(
                "Error category '{}' cannot be suppressed",
                category
            )));
        }

        Ok(Self { suppressed })
    }

    /// Policy suppressing nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Policy suppressing every suppressible category
    pub fn all() -> Self {
        Self {
            suppressed: BTreeSet::from([ErrorCategory::All]),
        }
    }

    /// Compatibility shim for boolean configuration
    pub fn from_flag(suppress_all: bool) -> Self {
        if suppress_all {
            Self::all()
        } else {
            Self::none()
        }
    }

    /// Build a policy from its configuration form
    pub fn from_setting(setting: &SuppressionSetting) -> Result<Self> {
        match setting {
            SuppressionSetting::Flag(flag) => Ok(Self::from_flag(*flag)),
            SuppressionSetting::Categories(categories) => Self::new(categories.iter().copied()),
        }
    }

    /// Whether failures of `category` turn into placeholders
    pub fn is_suppressed(&self, category: ErrorCategory) -> bool {
        if !category.is_suppressible() || self.suppressed.contains(&ErrorCategory::None) {
            return false;
        }
        self.suppressed.contains(&ErrorCategory::All) || self.suppressed.contains(&category)
    }

    /// Whether the policy is the global `All`
    pub fn suppresses_all(&self) -> bool {
        self.suppressed.contains(&ErrorCategory::All)
    }

    /// The configured categories
    pub fn categories(&self) -> impl Iterator<Item = ErrorCategory> + '_ {
        self.suppressed.iter().copied()
    }

    /// Swallow `error` if the policy suppresses its category, otherwise return it
    pub fn suppress(&self, error: KeyglotError, locale: &LocaleId) -> Result<()> {
        match error.category() {
            Some(category) if self.is_suppressed(category) => {
                logging::log_suppressed_error(&error, logging::locale_label(&locale.to_string()));
                Ok(())
            }
            _ => Err(error),
        }
    }
}
