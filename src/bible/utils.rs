//! Text folding helpers shared by the resolver, the canon and the cache.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Decomposes accented characters and drops the combining marks.
///
/// `"Génesis"` becomes `"Genesis"`, `"Ñ"` becomes `"N"`. Case is preserved.
pub fn fold_diacritics(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Folded, lowercased, trimmed form used as a lookup key for book names.
pub fn fold_key(input: &str) -> String {
    fold_diacritics(input.trim()).to_lowercase()
}

/// Like [`fold_key`] but also strips one trailing period, so `"Fil."` and `"Fil"` collide.
pub fn book_key(input: &str) -> String {
    let folded = fold_key(input);
    match folded.strip_suffix('.') {
        Some(stripped) => stripped.trim_end().to_string(),
        None => folded,
    }
}
