//! The content-provider seam and decoding of its payloads.
//!
//! A provider returns raw JSON for one chapter. Three payload shapes are understood:
//!
//! ```text
//! { "text": ["En el principio...", "Y la tierra..."] }        one string per verse
//! { "verses": [{ "number": 1, "text": "En el principio..." }] } numbered verse objects
//! { "text": "[1] En el principio... [2] Y la tierra..." }       one pre-joined string
//! ```
//!
//! Verse arrays and bracketed strings are normalized to newline-separated `"[n] text"` lines.
//! Any other string is stored as sent. An optional `"reference"` string labels the chapter.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use super::types::error::{CatalogError, FetchError, ProviderError, Result};
use super::types::models::{ChapterContent, ChapterReference};
use super::utils;
use super::verses::{self, VerseMap};

/// Source of chapter text, typically a remote Bible API.
///
/// `book` is always a resolved, canonical book name.
#[async_trait]
pub trait ChapterProvider: Send + Sync {
    async fn provide(&self, book: &str, chapter: u32) -> std::result::Result<Value, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct ProviderVerse {
    #[serde(alias = "verse")]
    number: u32,
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PayloadBody {
    Lines { text: Vec<String> },
    Verses { verses: Vec<ProviderVerse> },
    Joined { text: String },
}

/// Decodes a provider payload into chapter content for `reference`.
pub fn decode_payload(reference: &ChapterReference, payload: Value) -> Result<ChapterContent> {
    let label = payload
        .get("reference")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let body: PayloadBody = serde_json::from_value(payload)?;
    let text = match body {
        PayloadBody::Lines { text } => text
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| format!("[{}] {}", i + 1, line.trim()))
            .collect::<Vec<_>>()
            .join("\n"),
        PayloadBody::Verses { mut verses } => {
            verses.sort_by_key(|v| v.number);
            verses
                .iter()
                .filter(|v| !v.text.trim().is_empty())
                .map(|v| format!("[{}] {}", v.number, v.text.trim()))
                .collect::<Vec<_>>()
                .join("\n")
        }
        // Only bracketed text can be split onto lines without losing anything; numbered
        // lines are left for the verse parser at extraction time.
        PayloadBody::Joined { text } if verses::is_fully_tagged(&text) => {
            VerseMap::parse(&text).to_tagged_text()
        }
        PayloadBody::Joined { text } => text.trim().to_string(),
    };

    if text.is_empty() {
        return Err(FetchError::EmptyChapter);
    }

    Ok(ChapterContent {
        book: reference.book.clone(),
        chapter: reference.chapter,
        text,
        reference: label.unwrap_or_else(|| reference.to_string()),
    })
}

/// An in-memory provider over a fixed catalog of chapter payloads.
///
/// Useful offline and in tests. Counts how many requests it has served.
#[derive(Debug, Default)]
pub struct StaticProvider {
    chapters: HashMap<(String, u32), Value>,
    requests: AtomicUsize,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the payload for one chapter.
    pub fn insert(&mut self, book: &str, chapter: u32, payload: Value) {
        self.chapters.insert((utils::fold_key(book), chapter), payload);
    }

    /// Parses a catalog of the form `{"Genesis": {"1": <payload>, ...}, ...}`.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, CatalogError> {
        let catalog: HashMap<String, HashMap<String, Value>> = serde_json::from_str(json)?;
        let mut provider = Self::new();
        for (book, chapters) in catalog {
            for (chapter, payload) in chapters {
                let chapter = chapter.trim().parse::<u32>().map_err(|_| {
                    CatalogError::Layout(format!(
                        "chapter key {:?} of {} is not a number",
                        chapter, book
                    ))
                })?;
                provider.insert(&book, chapter, payload);
            }
        }
        Ok(provider)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> std::result::Result<Self, CatalogError> {
        let path = path.as_ref();
        info!("Loading chapter catalog: {}", path.display());
        let json = std::fs::read_to_string(path)?;
        let provider = Self::from_json_str(&json)?;
        debug!("Catalog holds {} chapters", provider.len());
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Number of `provide` calls served so far, hits and misses alike.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChapterProvider for StaticProvider {
    async fn provide(&self, book: &str, chapter: u32) -> std::result::Result<Value, ProviderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.chapters
            .get(&(utils::fold_key(book), chapter))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                book: book.to_string(),
                chapter,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn juan_3() -> ChapterReference {
        ChapterReference::new("Juan", 3)
    }

    #[test]
    fn string_array_is_numbered_in_order() {
        let payload = json!({ "text": [" uno ", "dos", "tres"] });
        let content = decode_payload(&juan_3(), payload).unwrap();
        assert_eq!(content.text, "[1] uno\n[2] dos\n[3] tres");
        assert_eq!(content.reference, "Juan 3");
    }

    #[test]
    fn verse_objects_are_sorted_by_number() {
        let payload = json!({
            "reference": "Juan 3:1-2",
            "verses": [{ "number": 2, "text": "dos" }, { "verse": 1, "text": "uno" }]
        });
        let content = decode_payload(&juan_3(), payload).unwrap();
        assert_eq!(content.text, "[1] uno\n[2] dos");
        assert_eq!(content.reference, "Juan 3:1-2");
    }

    #[test]
    fn joined_string_is_split_onto_lines() {
        let content = decode_payload(&juan_3(), json!({ "text": "[1] uno [2] dos" })).unwrap();
        assert_eq!(content.text, "[1] uno\n[2] dos");
    }

    #[test]
    fn bracketed_string_with_heading_is_kept_whole() {
        let text = "Salmo de David.\n[1] uno [2] dos";
        let content = decode_payload(&juan_3(), json!({ "text": text })).unwrap();
        assert_eq!(content.text, text);
    }

    #[test]
    fn numbered_lines_keep_continuation_lines() {
        let text = "1 Había un hombre de los fariseos\n\
                    que se llamaba Nicodemo.\n\
                    2 Este vino a Jesús de noche.";
        let content = decode_payload(&juan_3(), json!({ "text": text })).unwrap();
        assert_eq!(content.text, text);
    }

    #[test]
    fn prose_with_a_leading_number_is_not_truncated() {
        let text = "Y llovió sobre la tierra\n\
                    40 días y 40 noches\n\
                    y las aguas crecieron mucho sobre la tierra.";
        let reference = ChapterReference::new("Genesis", 7);
        let content = decode_payload(&reference, json!({ "text": text })).unwrap();
        assert_eq!(content.text, text);
    }

    #[test]
    fn unnumbered_string_is_kept_verbatim() {
        let content = decode_payload(&juan_3(), json!({ "text": "  prosa libre  " })).unwrap();
        assert_eq!(content.text, "prosa libre");
    }

    #[test]
    fn malformed_and_empty_payloads_fail() {
        assert!(matches!(
            decode_payload(&juan_3(), json!({ "contenido": 1 })),
            Err(FetchError::MalformedPayload(_))
        ));
        assert!(matches!(
            decode_payload(&juan_3(), json!("texto suelto")),
            Err(FetchError::MalformedPayload(_))
        ));
        assert_eq!(
            decode_payload(&juan_3(), json!({ "text": [] })),
            Err(FetchError::EmptyChapter)
        );
    }

    #[test]
    fn catalog_layout_is_validated() {
        let provider =
            StaticProvider::from_json_str(r#"{"Juan": {"3": {"text": ["a"]}}}"#).unwrap();
        assert_eq!(provider.len(), 1);
        assert!(matches!(
            StaticProvider::from_json_str(r#"{"Juan": {"tres": {"text": ["a"]}}}"#),
            Err(CatalogError::Layout(_))
        ));
    }

    #[tokio::test]
    async fn static_provider_counts_requests() {
        let mut provider = StaticProvider::new();
        provider.insert("Juan", 3, json!({ "text": ["a"] }));
        assert!(provider.provide("juan", 3).await.is_ok());
        assert_eq!(
            provider.provide("Juan", 4).await,
            Err(ProviderError::NotFound { book: "Juan".into(), chapter: 4 })
        );
        assert_eq!(provider.requests(), 2);
    }
}
