//! Bounded least-recently-used cache of generated avatar images.
//!
//! Entries live in an `IndexMap` in recency order: the front is the least
//! recently used, a hit moves its entry to the back.

use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 120;

/// Identifies one cached image: who it depicts and the prompt template used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub display_name: String,
    pub prompt_template: String,
}

impl CacheKey {
    pub fn new(display_name: impl Into<String>, prompt_template: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            prompt_template: prompt_template.into(),
        }
    }
}

/// Data URIs keyed by [`CacheKey`]. The lock is never held across an await.
#[derive(Debug)]
pub struct ImageCache {
    entries: Mutex<IndexMap<CacheKey, String>>,
    capacity: usize,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ImageCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(IndexMap::with_capacity(capacity)),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<CacheKey, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut entries = self.lock();
        let value = entries.shift_remove(key)?;
        entries.insert(key.clone(), value.clone());
        Some(value)
    }

    /// Store `value` as the most recently used entry, evicting the least
    /// recently used one if the cache is full.
    pub fn insert(&self, key: CacheKey, value: String) {
        let mut entries = self.lock();
        entries.shift_remove(&key);
        entries.insert(key, value);
        while entries.len() > self.capacity {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                debug!(display_name = %evicted.display_name, "evicted cached image");
            }
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
