//! Keyed values built at most once
//!
//! The map lock is held only to fetch or insert a key's slot. Building a
//! value locks that slot alone, so slow construction for one key never
//! blocks readers or builders of another. A failed build leaves the slot
//! empty and the next caller retries.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::utils::errors::Result;

struct Slot<V> {
    value: OnceLock<V>,
    building: Mutex<()>,
}

impl<V> Slot<V> {
    fn new() -> Self {
        Self {
            value: OnceLock::new(),
            building: Mutex::new(()),
        }
    }
}

pub struct OnceMap<K, V> {
    slots: Mutex<HashMap<K, Arc<Slot<V>>>>,
}

impl<K, V> OnceMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The value for `key`, running `build` if no caller has built it yet
    ///
    /// Concurrent callers for the same key wait for the first build; callers
    /// for other keys proceed.
    pub fn get_or_try_build<F>(&self, key: &K, build: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        let slot = self.slot(key);
        if let Some(value) = slot.value.get() {
            return Ok(value.clone());
        }

        let _building = slot.building.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = slot.value.get() {
            return Ok(value.clone());
        }
        let value = build()?;
        Ok(slot.value.get_or_init(|| value).clone())
    }

    /// The built value for `key`, if any
    pub fn get(&self, key: &K) -> Option<V> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(key).and_then(|slot| slot.value.get().cloned())
    }

    /// Number of keys with a built value
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.value.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every slot; builds already in flight finish into detached slots
    pub fn clear(&self) {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn slot(&self, key: &K) -> Arc<Slot<V>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_insert_with(|| Arc::new(Slot::new())))
    }
}

impl<K, V> Default for OnceMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::KeyglotError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_builds_once() {
        let map: OnceMap<&str, usize> = OnceMap::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = map
                .get_or_try_build(&"a", || Ok(calls.fetch_add(1, Ordering::SeqCst) + 10))
                .unwrap();
            assert_eq!(value, 10);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(map.get(&"a"), Some(10));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_failed_build_is_retried() {
        let map: OnceMap<&str, usize> = OnceMap::new();
        let failed = map.get_or_try_build(&"a", || Err(KeyglotError::Config("down".to_string())));
        assert!(failed.is_err());
        assert!(map.is_empty());
        assert_eq!(map.get(&"a"), None);

        assert_eq!(map.get_or_try_build(&"a", || Ok(1)).unwrap(), 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_slow_build_does_not_block_other_keys() {
        let map: Arc<OnceMap<&'static str, usize>> = Arc::new(OnceMap::new());
        map.get_or_try_build(&"ready", || Ok(1)).unwrap();

        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let slow_map = Arc::clone(&map);
        let slow = thread::spawn(move || {
            slow_map.get_or_try_build(&"slow", || {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                Ok(2)
            })
        });
        started_rx.recv().unwrap();

        let (done_tx, done_rx) = mpsc::channel();
        let reader_map = Arc::clone(&map);
        thread::spawn(move || {
            let ready = reader_map.get_or_try_build(&"ready", || Ok(99)).unwrap();
            let other = reader_map.get_or_try_build(&"other", || Ok(3)).unwrap();
            let built = reader_map.len();
            done_tx.send((ready, other, built)).unwrap();
        });
        let (ready, other, built) = done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!((ready, other, built), (1, 3, 2));

        release_tx.send(()).unwrap();
        assert_eq!(slow.join().unwrap().unwrap(), 2);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_clear() {
        let map: OnceMap<&str, usize> = OnceMap::new();
        map.get_or_try_build(&"a", || Ok(1)).unwrap();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get_or_try_build(&"a", || Ok(2)).unwrap(), 2);
    }
}
