//! In-memory stores
//!
//! Tables live behind a lock so embedders can change them at runtime; a
//! change is visible to every session that has not cached the key yet.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::{StoreFactory, TranslationStore};
use crate::locale::LocaleId;
use crate::resolver::ResolverOptions;
use crate::utils::errors::{KeyglotError, Result};

/// A single locale's table
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    resource_id: Option<String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store reporting `resource_id` as its backing resource
    pub fn with_resource_id(resource_id: impl Into<String>) -> Self {
        Self {
            entries: RwLock::default(),
            resource_id: Some(resource_id.into()),
        }
    }

    /// Create a store from key/value pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        for (key, value) in pairs {
            store.insert(key, value);
        }
        store
    }

    /// Insert or replace a value
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Remove a value, returning it
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TranslationStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn resource_id(&self) -> Option<String> {
        self.resource_id.clone()
    }
}

/// In-memory backend holding one table per locale
///
/// Used as a [`StoreFactory`]: every locale gets its own table, created on
/// first use. Locales listed with [`MemoryBackend::fail_locale`] refuse
/// construction, which is how tests exercise backend failures.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<LocaleId, Arc<MemoryStore>>>,
    failing: RwLock<Vec<LocaleId>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for `locale`, created empty on first access
    pub fn table(&self, locale: &LocaleId) -> Arc<MemoryStore> {
        if let Some(table) = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locale)
        {
            return Arc::clone(table);
        }

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            tables
                .entry(locale.clone())
                .or_insert_with(|| Arc::new(MemoryStore::with_resource_id(format!("memory:{}", locale)))),
        )
    }

    /// Insert a value into the table for `locale`
    pub fn insert(&self, locale: &LocaleId, key: impl Into<String>, value: impl Into<String>) {
        self.table(locale).insert(key, value);
    }

    /// Make store construction for `locale` fail
    pub fn fail_locale(&self, locale: &LocaleId) {
        self.failing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(locale.clone());
    }
}

impl StoreFactory for MemoryBackend {
    fn create(&self, _options: &ResolverOptions, locale: &LocaleId) -> Result<Arc<dyn TranslationStore>> {
        let failing = self
            .failing
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(locale);
        if failing {
            return Err(KeyglotError::Backend {
                locale: locale.to_string(),
                reason: "memory backend configured to fail".to_string(),
            });
        }

        debug!(locale = %locale, "Creating in-memory store");
        let table: Arc<dyn TranslationStore> = self.table(locale);
        Ok(table)
    }
}
