//! Bible reference resolution and reading-plan engine.

pub mod books;
pub mod cache;
pub mod canon;
pub mod fetch;
pub mod plan;
pub mod provider;
pub mod types;
pub mod verses;
mod utils;

use chrono::NaiveDate;
use log::info;

use books::BookResolver;
use cache::ChapterCache;
use canon::Canon;
use fetch::ChapterFetcher;
use plan::ReadingPlan;
use provider::ChapterProvider;
use types::config::EngineConfig;
use types::error::Result;
use types::models::{ChapterContent, ChapterReference};
use verses::Passage;

pub use utils::fold_diacritics;

/// Entry point for callers: today's reading, book names, chapters and verse excerpts.
///
/// Owns the chapter cache for its lifetime. Create one per session and share it by reference.
#[derive(Debug)]
pub struct ReadingEngine<P> {
    fetcher: ChapterFetcher<P>,
    config: EngineConfig,
}

impl<P: ChapterProvider> ReadingEngine<P> {
    /// An engine over the standard canon.
    pub fn new(provider: P, config: EngineConfig) -> Self {
        Self::with_canon(provider, config, Canon::default())
    }

    pub fn with_canon(provider: P, config: EngineConfig, canon: Canon) -> Self {
        info!(
            "Reading plan starts {} over {} books ({} chapters), cache capacity {:?}",
            config.plan_start,
            canon.books().len(),
            canon.total_chapters(),
            config.cache_capacity
        );
        let cache = match config.cache_capacity {
            Some(capacity) => ChapterCache::with_capacity(capacity),
            None => ChapterCache::new(),
        };
        let plan = ReadingPlan::new(canon, config.plan_start);
        Self {
            fetcher: ChapterFetcher::new(provider, plan, cache),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn plan(&self) -> &ReadingPlan {
        self.fetcher.plan()
    }

    pub fn resolver(&self) -> &BookResolver {
        self.fetcher.resolver()
    }

    pub fn cache(&self) -> &ChapterCache {
        self.fetcher.cache()
    }

    pub fn provider(&self) -> &P {
        self.fetcher.provider()
    }

    /// Drops every cached chapter.
    pub fn clear_cache(&self) {
        self.fetcher.cache().clear();
    }

    /// Chapter the plan assigns to `date`.
    pub fn get_chapter_for_date(&self, date: NaiveDate) -> ChapterReference {
        self.plan().chapter_for(date)
    }

    /// Chapter the plan assigns to the current local day.
    pub fn todays_chapter(&self) -> ChapterReference {
        self.plan().today()
    }

    /// Canonical spelling of a book name; unknown names pass through accent-folded.
    pub fn resolve_book_name(&self, input: &str) -> String {
        self.resolver().resolve(input)
    }

    /// Fetches a chapter. Never fails: on error the content's text starts with
    /// [`FETCH_ERROR_MARKER`](types::models::FETCH_ERROR_MARKER).
    pub async fn fetch_chapter(&self, book: Option<&str>, chapter: Option<u32>) -> ChapterContent {
        self.fetcher.fetch(book, chapter).await
    }

    /// Fetches a chapter, reporting failures as a typed error.
    pub async fn try_fetch_chapter(
        &self,
        book: Option<&str>,
        chapter: Option<u32>,
    ) -> Result<ChapterContent> {
        self.fetcher.try_fetch(book, chapter).await
    }

    /// Extracts the verses named by `verse_spec` (`"16"`, `"4-7"`, `"1,3"`).
    pub async fn try_get_passage(
        &self,
        book: &str,
        chapter: u32,
        verse_spec: &str,
    ) -> Result<Passage> {
        let content = self.fetcher.try_fetch(Some(book), Some(chapter)).await?;
        Ok(verses::extract(&content.text, &content.book, content.chapter, verse_spec))
    }

    /// Text of the verses named by `verse_spec`. Never fails: fetch errors are returned as
    /// the error text itself, unparseable chapters come back whole behind a notice, and a
    /// selection with no matching verses yields a not-found message.
    pub async fn get_verse_text(&self, book: &str, chapter: u32, verse_spec: &str) -> String {
        let content = self.fetch_chapter(Some(book), Some(chapter)).await;
        if content.is_error() {
            return content.text;
        }
        verses::extract(&content.text, &content.book, content.chapter, verse_spec).to_string()
    }
}
