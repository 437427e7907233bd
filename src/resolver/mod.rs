//! Resolution engine internals
//!
//! [`ResolverOptions`] is the validated runtime form of
//! [`ResolverConfig`](crate::config::ResolverConfig). It is shared, read-only,
//! by every session built from it.

pub mod cache;
pub mod chain;
pub mod format;
pub mod include;
pub mod policy;

use crate::config::validation::validate_include_tag;
use crate::config::ResolverConfig;
use crate::locale::{LocaleFallback, LocaleId};
use crate::utils::errors::{KeyglotError, Result};

pub use cache::{CacheStats, TranslationCache};
pub use chain::FallbackChain;
pub use format::{Arg, ArgFormat, ClassPrefix, EscapeTemplate};
pub use include::IncludeResolver;
pub use policy::{ErrorPolicy, SuppressionSetting};

/// Validated resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    escape: EscapeTemplate,
    include_tag: String,
    policy: ErrorPolicy,
    class_prefix: ClassPrefix,
    arg_format: ArgFormat,
    fallback_enabled: bool,
    fallback: LocaleFallback,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            escape: EscapeTemplate::default(),
            include_tag: "@include".to_string(),
            policy: ErrorPolicy::none(),
            class_prefix: ClassPrefix::default(),
            arg_format: ArgFormat::default(),
            fallback_enabled: true,
            fallback: LocaleFallback::new(),
        }
    }
}

impl ResolverOptions {
    /// Validate a configuration section into runtime options
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let fallback = match &config.terminal_locale {
            Some(terminal) => {
                let terminal = LocaleId::parse(terminal).map_err(|e| {
                    KeyglotError::Config(format!("Invalid terminal locale '{}': {}", terminal, e))
                })?;
                LocaleFallback::with_terminal(terminal)
            }
            None => LocaleFallback::new(),
        };

        Ok(Self::default()
            .with_escape_template(&config.escape_template)?
            .with_include_tag(&config.include_tag)?
            .with_policy(ErrorPolicy::from_setting(&config.suppress_errors)?)
            .with_class_prefix(config.class_prefix)
            .with_arg_format(config.arg_format)
            .with_fallback_enabled(config.fallback)
            .with_locale_fallback(fallback))
    }

    pub fn with_escape_template(mut self, template: &str) -> Result<Self> {
        self.escape = EscapeTemplate::new(template)?;
        Ok(self)
    }

    pub fn with_include_tag(mut self, tag: &str) -> Result<Self> {
        validate_include_tag(tag)?;
        self.include_tag = tag.to_string();
        Ok(self)
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_class_prefix(mut self, class_prefix: ClassPrefix) -> Self {
        self.class_prefix = class_prefix;
        self
    }

    pub fn with_arg_format(mut self, arg_format: ArgFormat) -> Self {
        self.arg_format = arg_format;
        self
    }

    pub fn with_fallback_enabled(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    /// End every fallback chain at `terminal` instead of the root
    pub fn with_terminal_locale(self, terminal: LocaleId) -> Self {
        self.with_locale_fallback(LocaleFallback::with_terminal(terminal))
    }

    pub fn with_locale_fallback(mut self, fallback: LocaleFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn escape(&self) -> &EscapeTemplate {
        &self.escape
    }

    pub fn include_tag(&self) -> &str {
        &self.include_tag
    }

    pub fn policy(&self) -> &ErrorPolicy {
        &self.policy
    }

    pub fn class_prefix(&self) -> ClassPrefix {
        self.class_prefix
    }

    pub fn arg_format(&self) -> ArgFormat {
        self.arg_format
    }

    pub fn fallback_enabled(&self) -> bool {
        self.fallback_enabled
    }

    pub fn locale_fallback(&self) -> &LocaleFallback {
        &self.fallback
    }
}
