//! Error types for chapter retrieval.
//!
//! Nothing here ever escapes [`ReadingEngine::fetch_chapter`](crate::ReadingEngine::fetch_chapter)
//! or [`ReadingEngine::get_verse_text`](crate::ReadingEngine::get_verse_text); those fold a
//! [`FetchError`] into sentinel chapter content. The typed surface
//! ([`ReadingEngine::try_fetch_chapter`](crate::ReadingEngine::try_fetch_chapter)) hands it back.

use thiserror::Error;

/// Failures reported by a [`ChapterProvider`](crate::ChapterProvider) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request never produced a response (connection refused, DNS, timeout...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("provider responded with status {code}")]
    Status { code: u16 },

    /// The backend has no content for the requested chapter.
    #[error("no content for {book} {chapter}")]
    NotFound { book: String, chapter: u32 },
}

/// The primary error type for chapter retrieval.
///
/// `Clone` so that one outcome can be shared by every caller coalesced onto the same
/// in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The content provider itself failed.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// The provider answered, but the payload matched none of the known shapes.
    #[error("malformed chapter payload: {0}")]
    MalformedPayload(String),

    /// The payload decoded but carried no verse text.
    #[error("chapter payload contained no text")]
    EmptyChapter,

    /// The chapter number lies outside the book's range in the canon.
    #[error("{book} has {max} chapters, chapter {chapter} requested")]
    ChapterOutOfRange { book: String, chapter: u32, max: u32 },
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::MalformedPayload(e.to_string())
    }
}

/// A convenience `Result` type alias using the crate's `FetchError` type.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Failures while loading a chapter catalog for [`StaticProvider`](crate::StaticProvider).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON parsed but does not follow the `{book: {chapter: payload}}` layout.
    #[error("invalid catalog layout: {0}")]
    Layout(String),
}
