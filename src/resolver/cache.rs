//! Per-session memoization of resolved keys

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

/// Key to resolution-result cache; misses are cached as `None`
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: Mutex<HashMap<String, Option<String>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for `key`; the outer `None` means "not cached"
    pub fn get(&self, key: &str) -> Option<Option<String>> {
        let cached = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();

        match cached {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        cached
    }

    pub fn insert(&self, key: &str, value: Option<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    /// Forget one key, returning whether it was cached
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    /// Forget every key
    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            entries: self.len(),
            hits,
            misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_and_misses() {
        let cache = TranslationCache::new();
        assert_eq!(cache.get("a"), None);

        cache.insert("a", Some("A".to_string()));
        cache.insert("b", None);
        assert_eq!(cache.get("a"), Some(Some("A".to_string())));
        assert_eq!(cache.get("b"), Some(None));

        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = TranslationCache::new();
        cache.insert("a", Some("A".to_string()));
        cache.insert("b", Some("B".to_string()));

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats_serialize() {
        let json = serde_json::to_value(TranslationCache::new().stats()).unwrap();
        assert_eq!(json["entries"], 0);
        assert_eq!(json["hit_rate"], 0.0);
    }
}
