//! Bounded least-recently-used map
//!
//! The lock is held only for map bookkeeping. Callers that miss compute the value without the
//! lock and insert afterwards, so two concurrent misses on one key both compute and the last
//! insert wins.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

struct LruState<K, V> {
    entries: HashMap<K, (V, u64)>,
    recency: BTreeMap<u64, K>,
    clock:   u64,
}

impl<K: Clone + Eq + Hash, V> LruState<K, V> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn touch(&mut self, key: &K) {
        let now = self.tick();
        if let Some((_, stamp)) = self.entries.get_mut(key) {
            self.recency.remove(stamp);
            *stamp = now;
            self.recency.insert(now, key.clone());
        }
    }
}

/// Thread-safe LRU cache with a fixed capacity
pub struct LruCache<K, V> {
    capacity: usize,
    state:    Mutex<LruState<K, V>>,
}

impl<K: Clone + Eq + Hash, V: Clone> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state:    Mutex::new(LruState {
                entries: HashMap::new(),
                recency: BTreeMap::new(),
                clock:   0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruState<K, V>> {
        // Entries are only ever replaced whole, so a poisoned map is still consistent
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a key, marking it most recently used
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.lock();
        let value = state.entries.get(key).map(|(value, _)| value.clone())?;
        state.touch(key);
        Some(value)
    }

    /// Insert or replace a value, evicting the least recently used entry when full
    pub fn insert(&self, key: K, value: V) {
        let mut state = self.lock();
        let now = state.tick();

        if let Some((_, stamp)) = state.entries.insert(key.clone(), (value, now)) {
            state.recency.remove(&stamp);
        }
        state.recency.insert(now, key);

        while state.entries.len() > self.capacity {
            let Some((_, evicted)) = state.recency.pop_first() else {
                break;
            };
            state.entries.remove(&evicted);
        }
    }

    /// Return the cached value or compute, insert and return it
    ///
    /// `compute` runs without the lock held.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(key.clone(), value.clone());
        Ok(value)
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.recency.clear();
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
