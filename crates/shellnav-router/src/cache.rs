//! Bounded page cache (path -> HTML)
//!
//! Eviction is by insertion order: `set` moves a key to the back of the
//! queue, `get` does not. Capacity counts entries, not bytes.

use std::collections::{HashMap, VecDeque};

use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::path::CanonicalPath;

#[derive(Debug)]
pub struct PageCache {
    pages: HashMap<CanonicalPath, String>,
    /// Oldest first
    order: VecDeque<CanonicalPath>,
    capacity: usize,
}

impl PageCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pages: HashMap::with_capacity(capacity + 1),
            order: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pages.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.pages.contains_key(key)
    }

    /// Insert or refresh an entry, evicting the oldest one when over capacity.
    pub fn set(&mut self, key: CanonicalPath, html: String) {
        if self.pages.remove(key.as_str()).is_some() {
            self.order.retain(|k| k != &key);
        }

        self.order.push_back(key.clone());
        self.pages.insert(key, html);

        if self.pages.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.pages.remove(&oldest);
                tracing::debug!(path = %oldest, "Evicted page from cache");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys in eviction order, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &CanonicalPath> {
        self.order.iter()
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
