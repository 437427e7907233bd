//! Time-boxed caching around a slow store
//!
//! Meant for stores whose lookups hit an external system (a database
//! query, say). The entry map and the next reset timestamp sit behind one
//! mutex; the lock covers the check-and-clear and the insert, never the
//! inner lookup itself.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use super::{StoreFactory, TranslationStore};
use crate::locale::LocaleId;
use crate::resolver::ResolverOptions;
use crate::utils::errors::Result;

/// Upper bound on the cache window (100 years)
const MAX_TTL_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

#[derive(Debug)]
struct CacheState {
    entries: HashMap<String, Option<String>>,
    next_reset: DateTime<Utc>,
}

/// Caches lookups of an inner store for a fixed time window
#[derive(Debug)]
pub struct CachedStore {
    inner: Arc<dyn TranslationStore>,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl CachedStore {
    /// Wrap `inner`, clearing every cached entry once `ttl_seconds` elapse
    pub fn new(inner: Arc<dyn TranslationStore>, ttl_seconds: u64) -> Self {
        let seconds = i64::try_from(ttl_seconds).unwrap_or(MAX_TTL_SECONDS);
        let ttl = Duration::seconds(seconds.min(MAX_TTL_SECONDS));
        Self {
            inner,
            ttl,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                next_reset: Utc::now() + ttl,
            }),
        }
    }

    /// Drop every cached entry now
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.clear();
        state.next_reset = Utc::now() + self.ttl;
    }

    /// When the cache will next be cleared
    pub fn next_reset(&self) -> DateTime<Utc> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).next_reset
    }

    /// Get cache statistics
    pub fn stats(&self) -> CachedStoreStats {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        CachedStoreStats {
            cached_keys: state.entries.len(),
            next_reset: state.next_reset,
        }
    }

    /// Return the cached lookup for `key`, clearing the cache first if it expired
    fn cached(&self, key: &str, now: DateTime<Utc>) -> Option<Option<String>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if now >= state.next_reset {
            debug!(cleared = state.entries.len(), "Timed store cache expired");
            state.entries.clear();
            state.next_reset = now + self.ttl;
        }
        state.entries.get(key).cloned()
    }
}

impl TranslationStore for CachedStore {
    fn get(&self, key: &str) -> Option<String> {
        if let Some(hit) = self.cached(key, Utc::now()) {
            return hit;
        }

        let value = self.inner.get(key);

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.insert(key.to_string(), value.clone());
        value
    }

    fn resource_id(&self) -> Option<String> {
        self.inner.resource_id()
    }
}

/// Wraps every store built by an inner factory in a [`CachedStore`]
pub struct CachedStoreFactory {
    inner: Arc<dyn StoreFactory>,
    ttl_seconds: u64,
}

impl CachedStoreFactory {
    pub fn new(inner: Arc<dyn StoreFactory>, ttl_seconds: u64) -> Self {
        Self { inner, ttl_seconds }
    }
}

impl StoreFactory for CachedStoreFactory {
    fn create(&self, options: &ResolverOptions, locale: &LocaleId) -> Result<Arc<dyn TranslationStore>> {
        let store = self.inner.create(options, locale)?;
        Ok(Arc::new(CachedStore::new(store, self.ttl_seconds)))
    }
}

/// Timed cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CachedStoreStats {
    pub cached_keys: usize,
    pub next_reset: DateTime<Utc>,
}
