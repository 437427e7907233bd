//! Translation stores
//!
//! A store answers a single question for one locale: "what is stored under
//! this key?". Everything else (fallback, includes, caching, error policy)
//! is layered on top by the resolver. Backends are created by factories that
//! are registered by name; nothing is loaded reflectively.

pub mod cached;
pub mod file;
pub mod memory;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::locale::LocaleId;
use crate::resolver::ResolverOptions;
use crate::utils::errors::{KeyglotError, Result};

pub use cached::{CachedStore, CachedStoreFactory};
pub use file::{FileFormat, FileStore, FileStoreFactory};
pub use memory::{MemoryBackend, MemoryStore};

/// Key/value capability bound to one locale
pub trait TranslationStore: Send + Sync + fmt::Debug {
    /// Look up the raw value stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Identity of the backing resource, when the store has one
    ///
    /// Two stores reporting the same identity read the same data.
    fn resource_id(&self) -> Option<String> {
        None
    }
}

/// Creates the store for a locale
pub trait StoreFactory: Send + Sync {
    fn create(&self, options: &ResolverOptions, locale: &LocaleId) -> Result<Arc<dyn TranslationStore>>;
}

impl<F> StoreFactory for F
where
    F: Fn(&ResolverOptions, &LocaleId) -> Result<Arc<dyn TranslationStore>> + Send + Sync,
{
    fn create(&self, options: &ResolverOptions, locale: &LocaleId) -> Result<Arc<dyn TranslationStore>> {
        self(options, locale)
    }
}

/// Named store factories available to configuration
#[derive(Clone, Default)]
pub struct StoreRegistry {
    factories: HashMap<String, Arc<dyn StoreFactory>>,
}

impl StoreRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `json` and `toml` file backends reading `config`'s directory
    pub fn with_file_backends(config: &StoreConfig) -> Self {
        let mut registry = Self::new();
        for format in [FileFormat::Json, FileFormat::Toml] {
            registry.register(
                format.extension(),
                Arc::new(FileStoreFactory::new(&config.base_dir, config.base_name.as_str(), format)),
            );
        }
        registry
    }

    /// Register a factory under `name`, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, factory: Arc<dyn StoreFactory>) -> &mut Self {
        self.factories.insert(name.into(), factory);
        self
    }

    /// Look up the factory registered under `name`
    pub fn get(&self, name: &str) -> Result<Arc<dyn StoreFactory>> {
        self.factories.get(name).cloned().ok_or_else(|| {
            let mut known: Vec<&str> = self.factories.keys().map(String::as_str).collect();
            known.sort_unstable();
            KeyglotError::Config(format!(
                "Unknown store backend '{}'. Registered backends: {:?}",
                name, known
            ))
        })
    }

    /// Names of all registered backends
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("backends", &self.names())
            .finish()
    }
}
