//! Session cache of fetched chapters.
//!
//! Keys are `"{folded lowercase book}-{chapter}"`. The cache is unbounded by default; with a
//! capacity it evicts the least recently used chapter.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use lru::LruCache;

use super::types::models::ChapterContent;
use super::utils;

/// Builds the cache key for a book and chapter.
pub fn cache_key(book: &str, chapter: u32) -> String {
    format!("{}-{}", utils::fold_key(book), chapter)
}

/// Thread-safe chapter cache owned by a [`ChapterFetcher`](crate::ChapterFetcher).
#[derive(Debug)]
pub struct ChapterCache {
    entries: Mutex<LruCache<String, ChapterContent>>,
    capacity: Option<usize>,
}

impl ChapterCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(LruCache::unbounded()),
            capacity: None,
        }
    }

    /// A cache holding at most `capacity` chapters. A capacity of zero caches nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        let entries = match NonZeroUsize::new(capacity) {
            Some(bound) => LruCache::new(bound),
            None => LruCache::unbounded(),
        };
        Self {
            entries: Mutex::new(entries),
            capacity: Some(capacity),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, ChapterContent>> {
        // Entries are only ever replaced whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up a chapter and marks it as most recently used.
    pub fn get(&self, key: &str) -> Option<ChapterContent> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    /// Stores `content` under `key`, replacing any previous entry.
    pub fn insert(&self, key: String, content: ChapterContent) {
        if self.capacity == Some(0) {
            return;
        }
        if let Some((evicted, _)) = self.lock().push(key.clone(), content) {
            if evicted != key {
                debug!("Evicted {} from chapter cache", evicted);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached chapter.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for ChapterCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(book: &str, n: u32) -> ChapterContent {
        ChapterContent {
            book: book.to_string(),
            chapter: n,
            text: format!("[1] {} {}", book, n),
            reference: format!("{} {}", book, n),
        }
    }

    #[test]
    fn key_is_folded_and_lowercased() {
        assert_eq!(cache_key("Génesis", 1), "genesis-1");
        assert_eq!(cache_key("1 Corintios", 13), "1 corintios-13");
    }

    #[test]
    fn unbounded_cache_keeps_everything() {
        let cache = ChapterCache::new();
        for n in 1..=50 {
            cache.insert(cache_key("Genesis", n), chapter("Genesis", n));
        }
        assert_eq!(cache.len(), 50);
        assert_eq!(cache.get("genesis-7"), Some(chapter("Genesis", 7)));
    }

    #[test]
    fn bounded_cache_evicts_least_recently_used() {
        let cache = ChapterCache::with_capacity(2);
        cache.insert(cache_key("Rut", 1), chapter("Rut", 1));
        cache.insert(cache_key("Rut", 2), chapter("Rut", 2));
        assert!(cache.get("rut-1").is_some());
        cache.insert(cache_key("Rut", 3), chapter("Rut", 3));

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("rut-1"));
        assert!(!cache.contains("rut-2"));
        assert!(cache.contains("rut-3"));
    }

    #[test]
    fn reinsert_replaces_without_growing() {
        let cache = ChapterCache::with_capacity(2);
        cache.insert("rut-1".into(), chapter("Rut", 1));
        cache.insert("rut-1".into(), chapter("Rut", 1));
        cache.insert("rut-2".into(), chapter("Rut", 2));
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("rut-1"));
    }

    #[test]
    fn contains_does_not_refresh_recency() {
        let cache = ChapterCache::with_capacity(2);
        cache.insert("rut-1".into(), chapter("Rut", 1));
        cache.insert("rut-2".into(), chapter("Rut", 2));
        assert!(cache.contains("rut-1"));
        cache.insert("rut-3".into(), chapter("Rut", 3));
        assert!(!cache.contains("rut-1"));
        assert!(cache.contains("rut-2"));
    }

    #[test]
    fn zero_capacity_and_clear() {
        let none = ChapterCache::with_capacity(0);
        none.insert("rut-1".into(), chapter("Rut", 1));
        assert!(none.is_empty());

        let cache = ChapterCache::new();
        cache.insert("rut-1".into(), chapter("Rut", 1));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("rut-1"), None);
    }
}
