//! Locale fallback chain over per-locale stores
//!
//! Stores are constructed lazily, once per locale, the first time a lookup
//! falls through to that locale. Constructed stores live as long as the
//! chain. Building one locale's store never blocks lookups answered by
//! stores that already exist.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::locale::LocaleId;
use crate::resolver::ResolverOptions;
use crate::store::{StoreFactory, TranslationStore};
use crate::utils::errors::Result;
use crate::utils::logging;
use crate::utils::once_map::OnceMap;

pub struct FallbackChain {
    locale: LocaleId,
    options: Arc<ResolverOptions>,
    factory: Arc<dyn StoreFactory>,
    nodes: OnceMap<LocaleId, Arc<dyn TranslationStore>>,
}

impl FallbackChain {
    /// Build the chain for `locale`, constructing its own store immediately
    pub fn new(locale: LocaleId, options: Arc<ResolverOptions>, factory: Arc<dyn StoreFactory>) -> Result<Self> {
        let chain = Self {
            locale,
            options,
            factory,
            nodes: OnceMap::new(),
        };
        chain.store_for(&chain.locale)?;
        Ok(chain)
    }

    pub fn locale(&self) -> &LocaleId {
        &self.locale
    }

    /// Look `key` up in the chain's locale, then in each broader locale
    pub fn resolve(&self, key: &str) -> Result<Option<String>> {
        let fallback = self.options.locale_fallback();
        let mut locale = self.locale.clone();

        loop {
            let store = self.store_for(&locale)?;
            if let Some(value) = store.get(key) {
                return Ok(Some(value));
            }

            if !self.options.fallback_enabled() {
                return Ok(None);
            }
            let Some(next) = fallback.next(&locale) else {
                return Ok(None);
            };
            if fallback.is_terminal(&next) && self.is_terminal_resource(store.as_ref(), &next)? {
                return Ok(None);
            }

            logging::log_fallback_hop(
                key,
                logging::locale_label(&locale.to_string()),
                logging::locale_label(&next.to_string()),
            );
            locale = next;
        }
    }

    /// Number of stores constructed so far
    pub fn constructed(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `store` reads the same resource as the store for `terminal`
    fn is_terminal_resource(&self, store: &dyn TranslationStore, terminal: &LocaleId) -> Result<bool> {
        let Some(resource) = store.resource_id() else {
            return Ok(false);
        };
        let terminal = self.store_for(terminal)?;
        Ok(terminal.resource_id().as_deref() == Some(resource.as_str()))
    }

    /// The store for `locale`, constructed on first use
    fn store_for(&self, locale: &LocaleId) -> Result<Arc<dyn TranslationStore>> {
        self.nodes.get_or_try_build(locale, || {
            let store = self.factory.create(&self.options, locale)?;
            let label = locale.to_string();
            let resource = store.resource_id().unwrap_or_default();
            debug!(
                locale = logging::locale_label(&label),
                resource = %resource,
                "Constructed store"
            );
            Ok(store)
        })
    }
}

impl fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackChain")
            .field("locale", &self.locale)
            .field("constructed", &self.constructed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBackend, MemoryStore};
    use crate::utils::errors::KeyglotError;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn locale(tag: &str) -> LocaleId {
        LocaleId::parse(tag).unwrap()
    }

    fn chain(backend: Arc<MemoryBackend>, tag: &str, options: ResolverOptions) -> FallbackChain {
        FallbackChain::new(locale(tag), Arc::new(options), backend).unwrap()
    }

    #[test]
    fn test_most_specific_locale_wins() {
        let backend = Arc::new(MemoryBackend::new());
        backend.insert(&locale("de"), "greeting", "Hallo");
        backend.insert(&locale("de_DE"), "farewell", "Tschüss");
        backend.insert(&locale("de"), "farewell", "Auf Wiedersehen");
        backend.insert(&LocaleId::root(), "title", "Title");

        let chain = chain(backend, "de_DE", ResolverOptions::default());
        assert_eq!(chain.resolve("greeting").unwrap(), Some("Hallo".to_string()));
        assert_eq!(chain.resolve("farewell").unwrap(), Some("Tschüss".to_string()));
        assert_eq!(chain.resolve("title").unwrap(), Some("Title".to_string()));
        assert_eq!(chain.resolve("nothing").unwrap(), None);
    }

    #[test]
    fn test_fallback_disabled() {
        let backend = Arc::new(MemoryBackend::new());
        backend.insert(&locale("de"), "greeting", "Hallo");

        let options = ResolverOptions::default().with_fallback_enabled(false);
        let chain = chain(backend, "de_DE", options);
        assert_eq!(chain.resolve("greeting").unwrap(), None);
        assert_eq!(chain.constructed(), 1);
    }

    #[test]
    fn test_alternate_terminal_locale() {
        let backend = Arc::new(MemoryBackend::new());
        backend.insert(&locale("en"), "greeting", "Hello");
        backend.insert(&LocaleId::root(), "root_only", "Root");

        let options = ResolverOptions::default().with_terminal_locale(locale("en"));
        let chain = chain(backend, "de_DE", options);
        assert_eq!(chain.resolve("greeting").unwrap(), Some("Hello".to_string()));
        assert_eq!(chain.resolve("root_only").unwrap(), None);
    }

    #[test]
    fn test_stores_are_constructed_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let factory = move |_: &ResolverOptions, _: &LocaleId| -> Result<Arc<dyn TranslationStore>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(MemoryStore::new()))
        };

        let chain = FallbackChain::new(
            locale("de_DE_POSIX"),
            Arc::new(ResolverOptions::default()),
            Arc::new(factory),
        )
        .unwrap();
        chain.resolve("a").unwrap();
        chain.resolve("b").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(chain.constructed(), 4);
    }

    #[test]
    fn test_redundant_terminal_hop_is_skipped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let shared = Arc::new(MemoryStore::with_resource_id("messages.json"));
        shared.insert("key", "value");
        let factory = move |_: &ResolverOptions, _: &LocaleId| -> Result<Arc<dyn TranslationStore>> {
            counter.fetch_add(1, Ordering::SeqCst);
            let store: Arc<dyn TranslationStore> = shared.clone();
            Ok(store)
        };

        let chain = FallbackChain::new(locale("fr"), Arc::new(ResolverOptions::default()), Arc::new(factory)).unwrap();
        assert_eq!(chain.resolve("key").unwrap(), Some("value".to_string()));
        assert_eq!(chain.resolve("missing").unwrap(), None);

        // fr and the root were built; the hop onto the identical root resource was not taken.
        assert_eq!(chain.constructed(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unreached_terminal_is_not_constructed() {
        let factory = |_: &ResolverOptions, locale: &LocaleId| -> Result<Arc<dyn TranslationStore>> {
            if locale.language() == "en" {
                return Err(KeyglotError::Backend {
                    locale: locale.to_string(),
                    reason: "unavailable".to_string(),
                });
            }
            let store = MemoryStore::with_resource_id(format!("messages_{}.json", locale));
            if locale.region().is_empty() {
                store.insert("greeting", "Hallo");
            }
            let store: Arc<dyn TranslationStore> = Arc::new(store);
            Ok(store)
        };

        let options = ResolverOptions::default().with_terminal_locale(locale("en"));
        let chain = FallbackChain::new(locale("de_DE"), Arc::new(options), Arc::new(factory)).unwrap();
        assert_eq!(chain.resolve("greeting").unwrap(), Some("Hallo".to_string()));
        assert_eq!(chain.constructed(), 2);

        // A miss in `de` does reach the terminal.
        assert_matches!(chain.resolve("missing"), Err(KeyglotError::Backend { locale, .. }) if locale == "en");
    }

    #[test]
    fn test_construction_failure_propagates() {
        let backend = Arc::new(MemoryBackend::new());
        backend.fail_locale(&locale("de"));

        let result = FallbackChain::new(locale("de"), Arc::new(ResolverOptions::default()), backend.clone());
        assert_matches!(result, Err(KeyglotError::Backend { .. }));

        let chain = FallbackChain::new(locale("de_DE"), Arc::new(ResolverOptions::default()), backend).unwrap();
        assert_matches!(chain.resolve("missing"), Err(KeyglotError::Backend { .. }));
    }
}
