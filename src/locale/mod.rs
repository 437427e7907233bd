//! Locale identifiers and the fallback order between them
//!
//! A locale is a `(language, region, variant)` triple where every component
//! may be empty; the all-empty triple is the root locale. Fallback drops one
//! component at a time, most specific first, until the terminal locale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::errors::{KeyglotError, Result};

/// Locale identifier (e.g. `de`, `de_DE`, `de_DE_POSIX`, or the root)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleId {
    language: String,
    region: String,
    variant: String,
}

impl LocaleId {
    /// The root (unlocalized) locale
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a locale from its components
    ///
    /// A region without a language, or a variant without a region, is
    /// rejected; such identifiers have no place in the fallback order.
    pub fn new(language: &str, region: &str, variant: &str) -> Result<Self> {
        let language = language.trim();
        let region = region.trim();
        let variant = variant.trim();

        if language.is_empty() && !region.is_empty() {
            return Err(KeyglotError::InvalidParameter(format!(
                "Locale region '{}' given without a language",
                region
            )));
        }
        if region.is_empty() && !variant.is_empty() {
            return Err(KeyglotError::InvalidParameter(format!(
                "Locale variant '{}' given without a region",
                variant
            )));
        }
        for component in [language, region, variant] {
            if !component.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(KeyglotError::InvalidParameter(format!(
                    "Invalid locale component: '{}'",
                    component
                )));
            }
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            region: region.to_ascii_uppercase(),
            variant: variant.to_string(),
        })
    }

    /// Parse `de`, `de_DE`, `de-DE` or `de_DE_POSIX`; the empty string is the root
    pub fn parse(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(Self::root());
        }

        let parts: Vec<&str> = tag.split(['_', '-']).collect();
        if parts.len() > 3 || parts.iter().any(|part| part.is_empty()) {
            return Err(KeyglotError::InvalidParameter(format!(
                "Malformed locale identifier: '{}'",
                tag
            )));
        }

        let language = parts.first().copied().unwrap_or_default();
        let region = parts.get(1).copied().unwrap_or_default();
        let variant = parts.get(2).copied().unwrap_or_default();
        Self::new(language, region, variant)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Whether this is the all-empty root locale
    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.region.is_empty() && self.variant.is_empty()
    }

    /// Number of non-empty components (3 = most specific, 0 = root)
    pub fn specificity(&self) -> usize {
        [&self.language, &self.region, &self.variant]
            .iter()
            .filter(|component| !component.is_empty())
            .count()
    }

    /// The locale with its most specific component dropped, or `None` for the root
    pub fn broader(&self) -> Option<LocaleId> {
        if !self.variant.is_empty() {
            Some(Self {
                variant: String::new(),
                ..self.clone()
            })
        } else if !self.region.is_empty() {
            Some(Self {
                region: String::new(),
                ..self.clone()
            })
        } else if !self.language.is_empty() {
            Some(Self::root())
        } else {
            None
        }
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.region.is_empty() {
            write!(f, "_{}", self.region)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

impl FromStr for LocaleId {
    type Err = KeyglotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocaleId {
    type Error = KeyglotError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LocaleId> for String {
    fn from(locale: LocaleId) -> Self {
        locale.to_string()
    }
}

/// Computes the fallback order between locales
///
/// The terminal locale is where every chain stops. It is the root unless a
/// deployment configures a default language instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleFallback {
    terminal: LocaleId,
}

impl LocaleFallback {
    /// Fallback order ending at the root locale
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback order ending at `terminal` instead of the root
    pub fn with_terminal(terminal: LocaleId) -> Self {
        Self { terminal }
    }

    pub fn terminal(&self) -> &LocaleId {
        &self.terminal
    }

    /// Whether `locale` is the last stop of any chain
    pub fn is_terminal(&self, locale: &LocaleId) -> bool {
        locale == &self.terminal || locale.is_root()
    }

    /// The next broader locale to try, or `None` when `locale` is terminal
    pub fn next(&self, locale: &LocaleId) -> Option<LocaleId> {
        if self.is_terminal(locale) {
            return None;
        }
        match locale.broader() {
            Some(broader) if broader.is_root() => Some(self.terminal.clone()),
            other => other,
        }
    }

    /// Every locale tried for `locale`, most specific first
    pub fn chain(&self, locale: &LocaleId) -> Vec<LocaleId> {
        let mut chain = vec![locale.clone()];
        let mut current = locale.clone();
        while let Some(next) = self.next(&current) {
            // An alternate terminal may re-enter a locale already listed.
            if chain.contains(&next) {
                break;
            }
            chain.push(next.clone());
            current = next;
        }
        chain
    }

    /// Resource names to try for file-backed stores, most specific first
    ///
    /// `candidate_names("messages", de_DE)` yields `messages_de_DE`,
    /// `messages_de`, `messages`.
    pub fn candidate_names(&self, base_name: &str, locale: &LocaleId) -> Vec<String> {
        let mut names: Vec<String> = self
            .chain(locale)
            .iter()
            .map(|candidate| resource_name(base_name, candidate))
            .collect();

        if !names.iter().any(|name| name == base_name) {
            names.push(base_name.to_string());
        }
        names
    }
}

/// Resource name for exactly one locale
pub fn resource_name(base_name: &str, locale: &LocaleId) -> String {
    if locale.is_root() {
        base_name.to_string()
    } else {
        format!("{}_{}", base_name, locale)
    }
}
