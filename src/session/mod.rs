//! Sessions: the user-facing translation surface
//!
//! A [`Session`] binds one locale to a fallback chain, an include resolver,
//! a result cache and the error policy. [`ContextScope`] prefixes keys
//! before delegating, and [`NullSession`] stands in when a session could
//! not be built. All three implement [`Translator`].

pub mod registry;
pub mod scope;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::locale::LocaleId;
use crate::resolver::{
    Arg, CacheStats, ErrorPolicy, FallbackChain, IncludeResolver, ResolverOptions, TranslationCache,
};
use crate::store::StoreFactory;
use crate::utils::errors::{KeyglotError, Result};
use crate::utils::logging;

pub use registry::SessionRegistry;
pub use scope::ContextScope;

/// Outcome of resolving one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The stored value
    Found(String),
    /// The escape-template rendering of a key whose failure was suppressed
    Placeholder(String),
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Resolution::Found(value) | Resolution::Placeholder(value) => value,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Resolution::Found(value) | Resolution::Placeholder(value) => value,
        }
    }
}

/// Resolves translation keys for one locale
pub trait Translator: Send + Sync + fmt::Debug {
    fn locale(&self) -> &LocaleId;

    fn options(&self) -> &ResolverOptions;

    /// Resolve `key`, applying the error policy to every suppressible failure
    fn resolve(&self, key: &str) -> Result<Resolution>;

    /// A view that prefixes every key with `prefix.`
    fn context(self: Arc<Self>, prefix: &str) -> Result<Arc<dyn Translator>>;

    /// The value for `key`, or its placeholder
    fn get(&self, key: &str) -> Result<String> {
        self.resolve(key).map(Resolution::into_string)
    }

    /// The value for `key` with `args` substituted
    ///
    /// Placeholders are returned as they are; formatting failures are never
    /// suppressed.
    fn get_with_args(&self, key: &str, args: &[Arg]) -> Result<String> {
        match self.resolve(key)? {
            Resolution::Found(template) => self
                .options()
                .arg_format()
                .format(&template, args)
                .map_err(|cause| KeyglotError::Format {
                    key: key.to_string(),
                    cause,
                }),
            Resolution::Placeholder(placeholder) => Ok(placeholder),
        }
    }

    /// The value for `sub_key` under the prefix derived from `type_name`
    fn get_typed(&self, type_name: &str, sub_key: &str) -> Result<String> {
        let checked = if type_name.trim().is_empty() {
            Err(KeyglotError::InvalidParameter(
                "Type name must not be blank".to_string(),
            ))
        } else {
            validate_key(sub_key)
        };
        if let Err(error) = checked {
            return degrade(self.options(), self.locale(), error, sub_key).map(Resolution::into_string);
        }

        let prefix = self.options().class_prefix().derive(type_name);
        self.get(&format!("{}.{}", prefix, sub_key))
    }
}

impl dyn Translator {
    /// The value for `sub_key` under the prefix derived from type `T`
    pub fn get_for<T: ?Sized>(&self, sub_key: &str) -> Result<String> {
        self.get_typed(std::any::type_name::<T>(), sub_key)
    }
}

/// Reject blank keys and keys with an empty segment
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(KeyglotError::InvalidParameter(
            "Translation key must not be blank".to_string(),
        ));
    }

    if key.split('.').any(|segment| segment.trim().is_empty()) {
        return Err(KeyglotError::InvalidParameter(format!(
            "Translation key '{}' contains an empty segment",
            key
        )));
    }

    Ok(())
}

/// Hand `error` to the policy; when suppressed, render `raw_key` as a placeholder
pub(crate) fn degrade(
    options: &ResolverOptions,
    locale: &LocaleId,
    error: KeyglotError,
    raw_key: &str,
) -> Result<Resolution> {
    options.policy().suppress(error, locale)?;
    Ok(Resolution::Placeholder(options.escape().format(raw_key)))
}

/// Translator bound to one locale
pub struct Session {
    locale: LocaleId,
    options: Arc<ResolverOptions>,
    chain: FallbackChain,
    includes: IncludeResolver,
    cache: TranslationCache,
}

impl Session {
    /// Build a session, constructing the store for `locale` immediately
    pub fn new(locale: LocaleId, options: Arc<ResolverOptions>, factory: Arc<dyn StoreFactory>) -> Result<Self> {
        let chain = FallbackChain::new(locale.clone(), Arc::clone(&options), factory)?;
        let includes = IncludeResolver::new(options.include_tag());
        debug!(locale = %locale, "Session created");

        Ok(Self {
            locale,
            options,
            chain,
            includes,
            cache: TranslationCache::new(),
        })
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forget every cached result
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Forget the cached result for `key`
    pub fn invalidate(&self, key: &str) -> bool {
        self.cache.invalidate(key)
    }

    /// Direct lookup, then include directives
    fn lookup(&self, key: &str) -> Result<Option<String>> {
        if let Some(value) = self.chain.resolve(key)? {
            return Ok(Some(value));
        }

        match self.includes.resolve(key, |candidate| self.chain.resolve(candidate)) {
            Err(error @ KeyglotError::IncludeLoopDetected { .. }) => {
                self.options.policy().suppress(error, &self.locale)?;
                Ok(None)
            }
            other => other,
        }
    }
}

impl Translator for Session {
    fn locale(&self) -> &LocaleId {
        &self.locale
    }

    fn options(&self) -> &ResolverOptions {
        &self.options
    }

    fn resolve(&self, key: &str) -> Result<Resolution> {
        if let Err(error) = validate_key(key) {
            return degrade(&self.options, &self.locale, error, key);
        }

        let value = match self.cache.get(key) {
            Some(cached) => cached,
            None => match self.lookup(key) {
                Ok(value) => {
                    self.cache.insert(key, value.clone());
                    value
                }
                // A broader locale's store failed to build. Not cached; the next call retries.
                Err(error @ KeyglotError::Backend { .. }) if self.options.policy().suppresses_all() => {
                    logging::log_degraded_session(logging::locale_label(&self.locale.to_string()), &error);
                    return Ok(Resolution::Placeholder(self.options.escape().format(key)));
                }
                Err(error) => return Err(error),
            },
        };

        match value {
            Some(value) => Ok(Resolution::Found(value)),
            None => {
                let error = KeyglotError::MissingTranslation {
                    key: key.to_string(),
                    locale: self.locale.to_string(),
                };
                degrade(&self.options, &self.locale, error, key)
            }
        }
    }

    fn context(self: Arc<Self>, prefix: &str) -> Result<Arc<dyn Translator>> {
        ContextScope::new(self, prefix)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("locale", &self.locale)
            .field("chain", &self.chain)
            .field("cached_keys", &self.cache.len())
            .finish()
    }
}

/// Degraded translator that renders every key as a placeholder
#[derive(Debug, Clone)]
pub struct NullSession {
    locale: LocaleId,
    options: ResolverOptions,
}

impl NullSession {
    /// A degraded session suppressing every error category
    pub fn new(locale: LocaleId, options: &ResolverOptions) -> Self {
        Self {
            locale,
            options: options.clone().with_policy(ErrorPolicy::all()),
        }
    }
}

impl Translator for NullSession {
    fn locale(&self) -> &LocaleId {
        &self.locale
    }

    fn options(&self) -> &ResolverOptions {
        &self.options
    }

    fn resolve(&self, key: &str) -> Result<Resolution> {
        Ok(Resolution::Placeholder(self.options.escape().format(key)))
    }

    fn context(self: Arc<Self>, prefix: &str) -> Result<Arc<dyn Translator>> {
        ContextScope::new(self, prefix)
    }
}
