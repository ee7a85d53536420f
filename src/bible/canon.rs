//! The ordered table of books and chapter counts every reference is measured against.

use super::types::models::ChapterReference;
use super::utils;

/// Books of the canon in traditional order with their chapter counts.
const BOOKS: &[(&str, u32)] = &[
    // Antiguo Testamento
    ("Genesis", 50),
    ("Exodo", 40),
    ("Levitico", 27),
    ("Numeros", 36),
    ("Deuteronomio", 34),
    ("Josue", 24),
    ("Jueces", 21),
    ("Rut", 4),
    ("1 Samuel", 31),
    ("2 Samuel", 24),
    ("1 Reyes", 22),
    ("2 Reyes", 25),
    ("1 Cronicas", 29),
    ("2 Cronicas", 36),
    ("Esdras", 10),
    ("Nehemias", 13),
    ("Ester", 10),
    ("Job", 42),
    ("Salmos", 150),
    ("Proverbios", 31),
    ("Eclesiastes", 12),
    ("Cantares", 8),
    ("Isaias", 66),
    ("Jeremias", 52),
    ("Lamentaciones", 5),
    ("Ezequiel", 48),
    ("Daniel", 12),
    ("Oseas", 14),
    ("Joel", 3),
    ("Amos", 9),
    ("Abdias", 1),
    ("Jonas", 4),
    ("Miqueas", 7),
    ("Nahum", 3),
    ("Habacuc", 3),
    ("Sofonias", 3),
    ("Hageo", 2),
    ("Zacarias", 14),
    ("Malaquias", 4),
    // Nuevo Testamento
    ("Mateo", 28),
    ("Marcos", 16),
    ("Lucas", 24),
    ("Juan", 21),
    ("Hechos", 28),
    ("Romanos", 16),
    ("1 Corintios", 16),
    ("2 Corintios", 13),
    ("Galatas", 6),
    ("Efesios", 6),
    ("Filipenses", 4),
    ("Colosenses", 4),
    ("1 Tesalonicenses", 5),
    ("2 Tesalonicenses", 3),
    ("1 Timoteo", 6),
    ("2 Timoteo", 4),
    ("Tito", 3),
    ("Filemon", 1),
    ("Hebreos", 13),
    ("Santiago", 5),
    ("1 Pedro", 5),
    ("2 Pedro", 3),
    ("1 Juan", 5),
    ("2 Juan", 1),
    ("3 Juan", 1),
    ("Judas", 1),
    ("Apocalipsis", 22),
];

/// The 66-book canon with Spanish, unaccented canonical names.
pub const STANDARD_CANON: Canon = Canon::new(BOOKS);

/// Sum of every chapter count in [`STANDARD_CANON`].
pub const TOTAL_CHAPTERS: u64 = STANDARD_CANON.total_chapters();

/// An ordered, immutable table of `(canonical name, chapter count)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canon {
    books: &'static [(&'static str, u32)],
    total_chapters: u64,
}

impl Canon {
    /// Wraps a static book table.
    ///
    /// # Panics
    /// If the table is empty or any book has zero chapters.
    pub const fn new(books: &'static [(&'static str, u32)]) -> Self {
        assert!(!books.is_empty(), "canon must contain at least one book");
        let mut total = 0u64;
        let mut i = 0;
        while i < books.len() {
            assert!(books[i].1 > 0, "every book needs at least one chapter");
            total += books[i].1 as u64;
            i += 1;
        }
        Self {
            books,
            total_chapters: total,
        }
    }

    pub fn books(&self) -> &'static [(&'static str, u32)] {
        self.books
    }

    pub const fn total_chapters(&self) -> u64 {
        self.total_chapters
    }

    pub fn first_book(&self) -> &'static str {
        self.books[0].0
    }

    /// Index of a book in canonical order. Matching ignores case and accents.
    pub fn position(&self, book: &str) -> Option<usize> {
        let key = utils::fold_key(book);
        self.books
            .iter()
            .position(|(name, _)| utils::fold_key(name) == key)
    }

    /// Chapter count of a book, or `None` if the book is not in this canon.
    pub fn chapter_count(&self, book: &str) -> Option<u32> {
        self.position(book).map(|i| self.books[i].1)
    }

    /// Checks `1 <= chapter <= chapter_count(book)`. Unknown books are rejected.
    pub fn validate(&self, reference: &ChapterReference) -> bool {
        self.chapter_count(&reference.book)
            .map(|max| (1..=max).contains(&reference.chapter))
            .unwrap_or(false)
    }
}

impl Default for Canon {
    fn default() -> Self {
        STANDARD_CANON
    }
}
