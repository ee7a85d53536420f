//! Core data structures shared by the resolver, the plan, the fetcher and the verse parser.

use std::fmt;

use super::error::FetchError;

/// Literal prefix of the text carried by a chapter that failed to load.
pub const FETCH_ERROR_MARKER: &str = "Error cargando lectura.";

/// Reference label carried by a chapter that failed to load.
pub const OFFLINE_REFERENCE: &str = "Sin conexión";

/// A canonical `(book, chapter)` pair.
///
/// Chapters are 1-based. [`Canon::validate`](crate::Canon::validate) checks the upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChapterReference {
    pub book: String,
    pub chapter: u32,
}

impl ChapterReference {
    pub fn new(book: impl Into<String>, chapter: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
        }
    }
}

impl fmt::Display for ChapterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.book, self.chapter)
    }
}

/// The full text of one chapter.
///
/// `text` is newline-joined and verse-tagged: every line reads `"[n] verse text"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterContent {
    pub book: String,
    pub chapter: u32,
    pub text: String,
    /// Human-readable label such as `"Juan 3"`, or [`OFFLINE_REFERENCE`] on failure.
    pub reference: String,
}

impl ChapterContent {
    /// Builds the sentinel content returned in place of a failed fetch.
    pub fn from_error(book: impl Into<String>, chapter: u32, error: &FetchError) -> Self {
        Self {
            book: book.into(),
            chapter,
            text: format!("{} {}", FETCH_ERROR_MARKER, error),
            reference: OFFLINE_REFERENCE.to_string(),
        }
    }

    /// Returns `true` if this content stands in for a failed fetch.
    pub fn is_error(&self) -> bool {
        self.text.starts_with(FETCH_ERROR_MARKER)
    }

    pub fn chapter_reference(&self) -> ChapterReference {
        ChapterReference::new(self.book.clone(), self.chapter)
    }
}
