//! Verse-level parsing of chapter text.
//!
//! Chapter text arrives in whatever shape the content provider produced. [`VerseMap::parse`]
//! recovers a verse-number index from it, trying the bracketed `"[n] text"` form first and
//! falling back to numbered lines (`"n. text"` / `"n text"`). [`VerseSpec`] parses a
//! caller's selection such as `"4-7"` or `"1,3,10–12"`, and [`extract`] combines the two.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use log::{debug, trace};
use regex::Regex;

/// Heading placed above the whole chapter when no verse could be isolated.
pub const UNFILTERED_NOTICE: &str = "(Vista Completa - No se pudo filtrar versículo)";

/// Highest number accepted by the numbered-line fallback. Rejects years and other figures.
const MAX_LINE_VERSE: u32 = 199;

static BRACKET_PATTERN: OnceLock<Regex> = OnceLock::new();
static LINE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn bracket_regex() -> &'static Regex {
    BRACKET_PATTERN.get_or_init(|| Regex::new(r"\[(\d+)\]").expect("Invalid verse marker pattern"))
}

fn line_regex() -> &'static Regex {
    LINE_PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(\d{1,3})\.?[ \t]+(\S[^\r\n]*)")
            .expect("Invalid numbered line pattern")
    })
}

/// Which parser produced a [`VerseMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// `"[n] text"` markers anywhere in the text.
    Bracketed,
    /// `"n. text"` or `"n text"` at the start of a line.
    NumberedLines,
    /// Nothing recognisable; the map is empty.
    Unparsed,
}

/// Verse number to verse text, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseMap {
    verses: BTreeMap<u32, String>,
    strategy: ParseStrategy,
}

impl VerseMap {
    /// Builds the map, stopping at the first strategy that finds at least one verse.
    pub fn parse(text: &str) -> Self {
        let bracketed = parse_bracketed(text);
        if !bracketed.is_empty() {
            trace!("Parsed {} bracketed verses", bracketed.len());
            return Self {
                verses: bracketed,
                strategy: ParseStrategy::Bracketed,
            };
        }

        let numbered = parse_numbered_lines(text);
        if !numbered.is_empty() {
            debug!("No verse markers found; parsed {} numbered lines", numbered.len());
            return Self {
                verses: numbered,
                strategy: ParseStrategy::NumberedLines,
            };
        }

        debug!("Chapter text has no recognisable verse numbering");
        Self {
            verses: BTreeMap::new(),
            strategy: ParseStrategy::Unparsed,
        }
    }

    pub fn strategy(&self) -> ParseStrategy {
        self.strategy
    }

    pub fn get(&self, verse: u32) -> Option<&str> {
        self.verses.get(&verse).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.verses.iter().map(|(n, t)| (*n, t.as_str()))
    }

    /// Verses selected by `spec`, ascending. Numbers missing from the map are skipped.
    pub fn select<'a>(&'a self, spec: &'a VerseSpec) -> impl Iterator<Item = (u32, &'a str)> + 'a {
        self.iter().filter(move |(n, _)| spec.contains(*n))
    }

    /// Renders the map back into canonical `"[n] text"` lines.
    pub fn to_tagged_text(&self) -> String {
        tag_lines(self.iter())
    }
}

/// Byte span and number of every usable `[n]` marker. `[0]` and numbers too large for `u32`
/// are not verse markers and stay part of the surrounding text.
fn verse_markers(text: &str) -> Vec<(usize, usize, u32)> {
    bracket_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let n = caps[1].parse::<u32>().ok().filter(|&n| n > 0)?;
            Some((whole.start(), whole.end(), n))
        })
        .collect()
}

fn parse_bracketed(text: &str) -> BTreeMap<u32, String> {
    let markers = verse_markers(text);
    let mut verses = BTreeMap::new();
    for (i, &(_, body_start, n)) in markers.iter().enumerate() {
        let end = markers
            .get(i + 1)
            .map(|&(next_start, _, _)| next_start)
            .unwrap_or(text.len());
        verses.insert(n, text[body_start..end].trim().to_string());
    }
    verses
}

/// `true` if re-rendering `text` as `"[n] text"` lines keeps every character of it: the text
/// opens with a verse marker and no verse number repeats.
pub fn is_fully_tagged(text: &str) -> bool {
    let markers = verse_markers(text);
    let Some(&(first_start, _, _)) = markers.first() else {
        return false;
    };
    let mut seen = BTreeSet::new();
    text[..first_start].trim().is_empty() && markers.iter().all(|&(_, _, n)| seen.insert(n))
}

fn parse_numbered_lines(text: &str) -> BTreeMap<u32, String> {
    line_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let n = caps[1].parse::<u32>().ok()?;
            (1..=MAX_LINE_VERSE)
                .contains(&n)
                .then(|| (n, caps[2].trim().to_string()))
        })
        .collect()
}

fn tag_lines<'a>(verses: impl Iterator<Item = (u32, &'a str)>) -> String {
    verses
        .map(|(n, t)| format!("[{}] {}", n, t))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A set of verse numbers: single numbers and inclusive ranges, comma separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseSpec {
    raw: String,
    ranges: Vec<RangeInclusive<u32>>,
}

impl VerseSpec {
    /// Parses `"3"`, `"4-7"`, `"7-4"`, `"1,3"`, `"1-3, 5"`. En and em dashes count as hyphens.
    /// Segments that are not numbers are ignored.
    pub fn parse(spec: &str) -> Self {
        let normalized: String = spec
            .chars()
            .map(|c| match c {
                '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
                other => other,
            })
            .collect();

        let ranges = normalized
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .filter_map(|segment| match segment.split_once('-') {
                Some((a, b)) => {
                    let a = a.trim().parse::<u32>().ok()?;
                    let b = b.trim().parse::<u32>().ok()?;
                    Some(a.min(b)..=a.max(b))
                }
                None => segment.parse::<u32>().ok().map(|n| n..=n),
            })
            .collect();

        Self {
            raw: spec.trim().to_string(),
            ranges,
        }
    }

    pub fn contains(&self, verse: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(&verse))
    }

    /// `true` if no segment parsed.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for VerseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Outcome of extracting verses from a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Passage {
    /// The requested verses as `"[n] text"` lines.
    Verses(String),
    /// No verse numbering could be recovered; the whole chapter text.
    Unfiltered(String),
    /// The text parsed, but none of the requested verses exist in it.
    NotFound {
        spec: String,
        book: String,
        chapter: u32,
    },
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Passage::Verses(text) => f.write_str(text),
            Passage::Unfiltered(text) => write!(f, "{}\n\n{}", UNFILTERED_NOTICE, text),
            Passage::NotFound { spec, book, chapter } => write!(
                f,
                "No se encontraron los versículos {} en {} {}.",
                spec, book, chapter
            ),
        }
    }
}

/// Extracts the verses named by `spec` from verse-tagged chapter `text`.
pub fn extract(text: &str, book: &str, chapter: u32, spec: &str) -> Passage {
    let map = VerseMap::parse(text);
    if map.is_empty() {
        return Passage::Unfiltered(text.to_string());
    }

    let spec = VerseSpec::parse(spec);
    let selected = tag_lines(map.select(&spec));
    let selected = selected.trim();
    if selected.is_empty() {
        debug!("None of verses {:?} exist in {} {}", spec.as_str(), book, chapter);
        return Passage::NotFound {
            spec: spec.as_str().to_string(),
            book: book.to_string(),
            chapter,
        };
    }
    Passage::Verses(selected.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracketed_text_spanning_lines() {
        let text = "[1] En el principio\ncreó Dios [2] Y la tierra\n[3] Y dijo Dios";
        let map = VerseMap::parse(text);
        assert_eq!(map.strategy(), ParseStrategy::Bracketed);
        assert_eq!(map.get(1), Some("En el principio\ncreó Dios"));
        assert_eq!(map.get(2), Some("Y la tierra"));
        assert_eq!(map.get(3), Some("Y dijo Dios"));
    }

    #[test]
    fn zero_and_oversized_markers_stay_in_the_previous_verse() {
        let map = VerseMap::parse("[1] a [0] b [99999999999] c\n[2] d");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(1), Some("a [0] b [99999999999] c"));
        assert_eq!(map.get(2), Some("d"));
    }

    #[test]
    fn fully_tagged_detection() {
        assert!(is_fully_tagged("  [1] a [2] b"));
        assert!(!is_fully_tagged("Salmo de David. [1] a [2] b"));
        assert!(!is_fully_tagged("[1] a [1] b"));
        assert!(!is_fully_tagged("1 a\n2 b"));
        assert!(!is_fully_tagged("[0] a"));
    }

    #[test]
    fn numbered_lines_fallback_rejects_years() {
        let text = "1. Bienaventurado el varón\n\
                    2 Sino que en la ley\n\
                    1990 fue un buen año\n\
                    250 personas";
        let map = VerseMap::parse(text);
        assert_eq!(map.strategy(), ParseStrategy::NumberedLines);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(1), Some("Bienaventurado el varón"));
        assert_eq!(map.get(2), Some("Sino que en la ley"));
    }

    #[test]
    fn unnumbered_prose_is_unparsed() {
        let map = VerseMap::parse("Texto sin numeración alguna.");
        assert_eq!(map.strategy(), ParseStrategy::Unparsed);
        assert!(map.is_empty());
    }

    #[test]
    fn spec_normalizes_dashes_and_reorders() {
        let spec = VerseSpec::parse("7–4, 10—11,x, 2");
        for n in [2, 4, 5, 6, 7, 10, 11] {
            assert!(spec.contains(n), "missing {}", n);
        }
        for n in [1, 3, 8, 9, 12] {
            assert!(!spec.contains(n), "unexpected {}", n);
        }
    }

    #[test]
    fn garbage_spec_is_empty() {
        assert!(VerseSpec::parse("abc, -").is_empty());
        assert!(VerseSpec::parse("").is_empty());
    }

    #[test]
    fn range_comes_out_ascending_regardless_of_source_order() {
        let text = "[7] siete\n[5] cinco\n[4] cuatro\n[6] seis\n[8] ocho";
        let passage = extract(text, "Juan", 1, "4-7");
        assert_eq!(
            passage,
            Passage::Verses("[4] cuatro\n[5] cinco\n[6] seis\n[7] siete".to_string())
        );
    }

    #[test]
    fn list_skips_unrequested_verses() {
        let passage = extract("[1] a\n[2] b\n[3] c", "Rut", 1, "1,3");
        assert_eq!(passage.to_string(), "[1] a\n[3] c");
    }

    #[test]
    fn overlapping_segments_are_deduplicated() {
        let passage = extract("[1] a\n[2] b\n[3] c", "Rut", 1, "1-2,2,2-3");
        assert_eq!(passage.to_string(), "[1] a\n[2] b\n[3] c");
    }

    #[test]
    fn missing_verses_report_not_found() {
        let passage = extract("[1] a\n[2] b", "Judas", 1, "30-31");
        assert_eq!(
            passage,
            Passage::NotFound {
                spec: "30-31".into(),
                book: "Judas".into(),
                chapter: 1
            }
        );
        assert_eq!(passage.to_string(), "No se encontraron los versículos 30-31 en Judas 1.");
    }

    #[test]
    fn unparseable_text_is_returned_whole_with_notice() {
        let passage = extract("Sin números", "Job", 3, "1");
        assert_eq!(passage, Passage::Unfiltered("Sin números".into()));
        assert_eq!(
            passage.to_string(),
            "(Vista Completa - No se pudo filtrar versículo)\n\nSin números"
        );
    }

    #[test]
    fn tagged_text_round_trips() {
        let map = VerseMap::parse("1 a\n2 b");
        assert_eq!(map.to_tagged_text(), "[1] a\n[2] b");
    }
}
