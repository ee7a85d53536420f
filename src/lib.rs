//! # lectura
//!
//! Bible reference resolution and daily reading-plan engine.
//!
//! - Maps calendar days onto chapters of the canon, one chapter a day, wrapping around.
//! - Resolves free-text and abbreviated book names ("Fil.", "1 Cor", "Génesis").
//! - Fetches chapters through a pluggable [`ChapterProvider`], caching them per session.
//! - Extracts single verses, ranges and lists from loosely formatted chapter text.
pub mod bible;

// Re-export the main types for convenience
pub use bible::{
    books::{resolve_book_name, BookResolver},
    cache::ChapterCache,
    canon::{Canon, STANDARD_CANON, TOTAL_CHAPTERS},
    fetch::ChapterFetcher,
    fold_diacritics,
    plan::{chapter_at_offset, get_chapter_for_date, ReadingPlan},
    provider::{ChapterProvider, StaticProvider},
    types::{
        config::EngineConfig,
        error::{CatalogError, FetchError, ProviderError, Result},
        models::{ChapterContent, ChapterReference, FETCH_ERROR_MARKER, OFFLINE_REFERENCE},
    },
    verses::{Passage, VerseMap, VerseSpec},
    ReadingEngine,
};
