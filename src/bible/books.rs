//! Book name resolution.
//!
//! Free-text book names ("Fil.", "flp", "1 Cor", "Génesis") are mapped onto the canonical
//! spelling used by the [`Canon`]. All spellings are indexed once, under a folded key
//! (accents stripped, lowercased, trailing period removed), so every spelling costs one
//! hash lookup regardless of how the caller typed the name.

use std::collections::HashMap;
use std::sync::OnceLock;

use log::trace;

use super::canon::{Canon, STANDARD_CANON};
use super::utils;

/// Common spellings and abbreviations, grouped under the canonical book name they resolve to.
///
/// Canonical names themselves are indexed separately and need not appear here.
const ABBREVIATIONS: &[(&str, &[&str])] = &[
    ("Genesis", &["Génesis", "Gén.", "Gn", "Ge"]),
    ("Exodo", &["Éxodo", "Éx.", "Exo"]),
    ("Levitico", &["Levítico", "Lev.", "Lv"]),
    ("Numeros", &["Números", "Núm.", "Nm", "Nu"]),
    ("Deuteronomio", &["Deut.", "Deu", "Dt"]),
    ("Josue", &["Josué", "Jos."]),
    ("Jueces", &["Jue.", "Jc"]),
    ("Rut", &["Rt"]),
    ("1 Samuel", &["1 Sam.", "1 Sm", "1 S", "1S", "1Sam"]),
    ("2 Samuel", &["2 Sam.", "2 Sm", "2 S", "2S", "2Sam"]),
    ("1 Reyes", &["1 Re.", "1 Rey", "1 R", "1R", "1Re"]),
    ("2 Reyes", &["2 Re.", "2 Rey", "2 R", "2R", "2Re"]),
    ("1 Cronicas", &["1 Crónicas", "1 Cr.", "1 Cro", "1Cr"]),
    ("2 Cronicas", &["2 Crónicas", "2 Cr.", "2 Cro", "2Cr"]),
    ("Esdras", &["Esd."]),
    ("Nehemias", &["Nehemías", "Neh.", "Ne"]),
    ("Ester", &["Est."]),
    ("Job", &["Jb"]),
    ("Salmos", &["Sal.", "Salmo", "Sl"]),
    ("Proverbios", &["Prov.", "Pro", "Pr"]),
    ("Eclesiastes", &["Eclesiastés", "Ecl.", "Ec", "Qo"]),
    ("Cantares", &["Cantar de los Cantares", "Cantar", "Cant.", "Cnt"]),
    ("Isaias", &["Isaías", "Is.", "Isa"]),
    ("Jeremias", &["Jeremías", "Jer.", "Jr"]),
    ("Lamentaciones", &["Lam.", "Lm"]),
    ("Ezequiel", &["Ez.", "Eze"]),
    ("Daniel", &["Dan.", "Dn"]),
    ("Oseas", &["Os.", "Ose"]),
    ("Joel", &["Jl"]),
    ("Amos", &["Amós", "Am."]),
    ("Abdias", &["Abdías", "Abd.", "Ab"]),
    ("Jonas", &["Jonás", "Jon.", "Jns"]),
    ("Miqueas", &["Miq.", "Mi"]),
    ("Nahum", &["Nahúm", "Nah.", "Na"]),
    ("Habacuc", &["Hab.", "Ha"]),
    ("Sofonias", &["Sofonías", "Sof.", "So"]),
    ("Hageo", &["Hag.", "Hg"]),
    ("Zacarias", &["Zacarías", "Zac.", "Za"]),
    ("Malaquias", &["Malaquías", "Mal.", "Ml"]),
    ("Mateo", &["Mat.", "Mt"]),
    ("Marcos", &["Mar.", "Mrc", "Mc", "Mr"]),
    ("Lucas", &["Luc.", "Lc", "Lu"]),
    ("Juan", &["Jua", "Jn"]),
    ("Hechos", &["Hech.", "Hec", "Hch"]),
    ("Romanos", &["Rom.", "Ro", "Rm"]),
    ("1 Corintios", &["1 Cor.", "1 Co", "1Co", "1Cor"]),
    ("2 Corintios", &["2 Cor.", "2 Co", "2Co", "2Cor"]),
    ("Galatas", &["Gálatas", "Gál.", "Ga"]),
    ("Efesios", &["Ef.", "Efe"]),
    ("Filipenses", &["Fil.", "Flp", "Fp"]),
    ("Colosenses", &["Col.", "Cl"]),
    ("1 Tesalonicenses", &["1 Tes.", "1 Ts", "1Ts", "1Tes"]),
    ("2 Tesalonicenses", &["2 Tes.", "2 Ts", "2Ts", "2Tes"]),
    ("1 Timoteo", &["1 Tim.", "1 Ti", "1Ti", "1Tim"]),
    ("2 Timoteo", &["2 Tim.", "2 Ti", "2Ti", "2Tim"]),
    ("Tito", &["Tit.", "Tt"]),
    ("Filemon", &["Filemón", "Filem.", "Flm"]),
    ("Hebreos", &["Heb.", "He"]),
    ("Santiago", &["Sant.", "Stg", "Sgo", "St"]),
    ("1 Pedro", &["1 Pe.", "1 Ped", "1 P", "1P", "1Pe"]),
    ("2 Pedro", &["2 Pe.", "2 Ped", "2 P", "2P", "2Pe"]),
    ("1 Juan", &["1 Jn", "1Jn", "1 Jua"]),
    ("2 Juan", &["2 Jn", "2Jn", "2 Jua"]),
    ("3 Juan", &["3 Jn", "3Jn", "3 Jua"]),
    ("Judas", &["Jud.", "Jds"]),
    ("Apocalipsis", &["Apoc.", "Apo", "Ap"]),
];

static DEFAULT_RESOLVER: OnceLock<BookResolver> = OnceLock::new();

/// Resolves a book name against the standard canon.
///
/// Never fails: an unknown name comes back accent-folded but otherwise untouched.
pub fn resolve_book_name(input: &str) -> String {
    DEFAULT_RESOLVER
        .get_or_init(|| BookResolver::new(&STANDARD_CANON))
        .resolve(input)
}

/// Maps spelling variants onto canonical book names.
#[derive(Debug, Clone)]
pub struct BookResolver {
    index: HashMap<String, &'static str>,
}

impl BookResolver {
    /// Indexes every canonical name of `canon` plus every abbreviation that targets one.
    pub fn new(canon: &Canon) -> Self {
        let mut index = HashMap::with_capacity(canon.books().len() + ABBREVIATIONS.len());
        for (name, _) in canon.books() {
            index.insert(utils::book_key(name), *name);
        }
        for (target, spellings) in ABBREVIATIONS {
            // Abbreviations for books outside a custom canon are simply not indexed.
            let Some(pos) = canon.position(target) else {
                continue;
            };
            for spelling in spellings.iter() {
                index
                    .entry(utils::book_key(spelling))
                    .or_insert(canon.books()[pos].0);
            }
        }
        Self { index }
    }

    /// Canonical name for `input`, or `None` if no spelling matched.
    pub fn resolve_known(&self, input: &str) -> Option<&'static str> {
        self.index.get(&utils::book_key(input)).copied()
    }

    /// Canonical name for `input`; falls back to the accent-folded, trimmed input.
    pub fn resolve(&self, input: &str) -> String {
        match self.resolve_known(input) {
            Some(name) => name.to_string(),
            None => {
                trace!("No book matches {:?}; passing it through", input);
                utils::fold_diacritics(input.trim())
            }
        }
    }

    /// Number of indexed spellings.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for BookResolver {
    fn default() -> Self {
        Self::new(&STANDARD_CANON)
    }
}
