//! Chapter retrieval: request normalization, caching and provider calls.
//!
//! Concurrent requests for the same uncached chapter are coalesced: the first caller runs
//! the provider call, the rest await its outcome. Only successful chapters are cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use tokio::sync::OnceCell;

use super::books::BookResolver;
use super::cache::{cache_key, ChapterCache};
use super::plan::ReadingPlan;
use super::provider::{decode_payload, ChapterProvider};
use super::types::error::{FetchError, Result};
use super::types::models::{ChapterContent, ChapterReference};

type InFlight = Arc<OnceCell<Result<ChapterContent>>>;

/// Fetches chapters through a [`ChapterProvider`], consulting a [`ChapterCache`] first.
#[derive(Debug)]
pub struct ChapterFetcher<P> {
    provider: P,
    resolver: BookResolver,
    plan: ReadingPlan,
    cache: ChapterCache,
    inflight: Mutex<HashMap<String, InFlight>>,
}

impl<P: ChapterProvider> ChapterFetcher<P> {
    pub fn new(provider: P, plan: ReadingPlan, cache: ChapterCache) -> Self {
        Self {
            provider,
            resolver: BookResolver::new(plan.canon()),
            plan,
            cache,
            inflight: Mutex::default(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn resolver(&self) -> &BookResolver {
        &self.resolver
    }

    pub fn plan(&self) -> &ReadingPlan {
        &self.plan
    }

    pub fn cache(&self) -> &ChapterCache {
        &self.cache
    }

    /// Fills in defaults and canonicalizes the book name.
    ///
    /// No book means today's plan chapter. A book without a chapter means its first chapter.
    pub fn resolve_request(&self, book: Option<&str>, chapter: Option<u32>) -> ChapterReference {
        match book {
            Some(book) => ChapterReference::new(self.resolver.resolve(book), chapter.unwrap_or(1)),
            None => {
                let today = self.plan.today();
                match chapter {
                    Some(chapter) => ChapterReference::new(today.book, chapter),
                    None => today,
                }
            }
        }
    }

    /// Fetches a chapter, returning failures as [`FetchError`].
    pub async fn try_fetch(
        &self,
        book: Option<&str>,
        chapter: Option<u32>,
    ) -> Result<ChapterContent> {
        let reference = self.resolve_request(book, chapter);
        self.fetch_reference(&reference).await
    }

    /// Fetches a chapter; failures come back as sentinel content
    /// (see [`ChapterContent::is_error`]).
    pub async fn fetch(&self, book: Option<&str>, chapter: Option<u32>) -> ChapterContent {
        let reference = self.resolve_request(book, chapter);
        match self.fetch_reference(&reference).await {
            Ok(content) => content,
            Err(e) => ChapterContent::from_error(reference.book, reference.chapter, &e),
        }
    }

    /// Fetches an already canonical reference.
    pub async fn fetch_reference(&self, reference: &ChapterReference) -> Result<ChapterContent> {
        if let Some(max) = self.plan.canon().chapter_count(&reference.book) {
            if !(1..=max).contains(&reference.chapter) {
                return Err(FetchError::ChapterOutOfRange {
                    book: reference.book.clone(),
                    chapter: reference.chapter,
                    max,
                });
            }
        }

        let key = cache_key(&reference.book, reference.chapter);
        if let Some(hit) = self.cache.get(&key) {
            debug!("Cache hit: {}", key);
            return Ok(hit);
        }
        debug!("Cache miss: {}", key);

        let cell = self.lock_inflight().entry(key.clone()).or_default().clone();
        let outcome = cell
            .get_or_init(|| async {
                // A request that finished between our cache check and joining the flight.
                if let Some(hit) = self.cache.get(&key) {
                    return Ok(hit);
                }
                self.load(reference, &key).await
            })
            .await
            .clone();

        let mut inflight = self.lock_inflight();
        if inflight.get(&key).is_some_and(|c| Arc::ptr_eq(c, &cell)) {
            inflight.remove(&key);
        }
        outcome
    }

    async fn load(&self, reference: &ChapterReference, key: &str) -> Result<ChapterContent> {
        info!("Requesting {} from content provider", reference);
        let loaded = match self.provider.provide(&reference.book, reference.chapter).await {
            Ok(payload) => decode_payload(reference, payload),
            Err(e) => Err(FetchError::from(e)),
        };
        match loaded {
            Ok(content) => {
                self.cache.insert(key.to_string(), content.clone());
                Ok(content)
            }
            Err(e) => {
                warn!("Failed to load {}: {}", reference, e);
                Err(e)
            }
        }
    }

    fn lock_inflight(&self) -> MutexGuard<'_, HashMap<String, InFlight>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bible::canon::STANDARD_CANON;
    use crate::bible::provider::StaticProvider;
    use crate::bible::types::error::ProviderError;
    use chrono::NaiveDate;
    use serde_json::json;

    fn fetcher(provider: StaticProvider) -> ChapterFetcher<StaticProvider> {
        let plan = ReadingPlan::new(STANDARD_CANON, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        ChapterFetcher::new(provider, plan, ChapterCache::new())
    }

    #[test]
    fn request_defaults() {
        let f = fetcher(StaticProvider::new());
        assert_eq!(f.resolve_request(Some("flp"), None), ChapterReference::new("Filipenses", 1));
        assert_eq!(f.resolve_request(Some("Sal."), Some(23)), ChapterReference::new("Salmos", 23));
        assert_eq!(f.resolve_request(None, None), f.plan().today());
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let mut provider = StaticProvider::new();
        provider.insert("Filipenses", 4, json!({ "text": ["a", "b"] }));
        let f = fetcher(provider);

        let first = f.try_fetch(Some("Fil."), Some(4)).await.unwrap();
        let second = f.try_fetch(Some("filipenses"), Some(4)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(f.provider().requests(), 1);
        assert!(f.cache().contains("filipenses-4"));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let f = fetcher(StaticProvider::new());
        let err = f.try_fetch(Some("Rut"), Some(2)).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Provider(ProviderError::NotFound { book: "Rut".into(), chapter: 2 })
        );
        let _ = f.try_fetch(Some("Rut"), Some(2)).await;
        assert_eq!(f.provider().requests(), 2);
        assert!(f.cache().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_never_reaches_provider() {
        let f = fetcher(StaticProvider::new());
        let err = f.try_fetch(Some("Judas"), Some(2)).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::ChapterOutOfRange { book: "Judas".into(), chapter: 2, max: 1 }
        );
        assert_eq!(f.provider().requests(), 0);
    }

    #[tokio::test]
    async fn sentinel_content_on_failure() {
        let f = fetcher(StaticProvider::new());
        let content = f.fetch(Some("Rut"), Some(3)).await;
        assert!(content.is_error());
        assert_eq!(content.book, "Rut");
        assert_eq!(content.chapter, 3);
        assert_eq!(content.reference, "Sin conexión");
    }
}
