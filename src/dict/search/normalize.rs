//! String normalization shared by the resolver and in-buffer search.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Which normalizations to apply before comparing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Normalizer {
    pub strip_diacritics: bool,
    pub fold_case: bool,
}

impl Normalizer {
    pub fn new(strip_diacritics: bool, fold_case: bool) -> Self {
        Self {
            strip_diacritics,
            fold_case,
        }
    }

    /// Diacritic stripping and case folding together.
    pub fn full() -> Self {
        Self::new(true, true)
    }

    /// Normalizes query text.
    pub fn apply(&self, text: &str) -> String {
        let stripped = if self.strip_diacritics {
            strip_diacritics(text)
        } else {
            text.to_string()
        };
        if self.fold_case {
            stripped.to_lowercase()
        } else {
            stripped
        }
    }

    /// Normalizes a lemma: the homograph digit suffix goes first.
    pub fn lemma(&self, lemma: &str) -> String {
        self.apply(strip_digit_suffix(lemma))
    }

    /// Normalizes `text` and records, for every output `char`, the index of
    /// the source `char` it came from.
    pub fn apply_with_origins(&self, text: &str) -> (String, Vec<usize>) {
        let mut out = String::with_capacity(text.len());
        let mut origins = Vec::with_capacity(text.len());
        for (idx, c) in text.chars().enumerate() {
            let mut push = |ch: char| {
                if self.fold_case {
                    for lower in ch.to_lowercase() {
                        out.push(lower);
                        origins.push(idx);
                    }
                } else {
                    out.push(ch);
                    origins.push(idx);
                }
            };
            if self.strip_diacritics {
                std::iter::once(c)
                    .nfd()
                    .filter(|d| !is_combining_mark(*d))
                    .for_each(&mut push);
            } else {
                push(c);
            }
        }
        (out, origins)
    }
}

/// Canonical decomposition followed by removal of combining marks.
///
/// - "café" → "cafe"
/// - "Árbol" → "Arbol"
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Drops a trailing run of ASCII digits used to tell homographs apart
/// ("bank1" → "bank"). An all-digit lemma is left alone.
pub fn strip_digit_suffix(lemma: &str) -> &str {
    let trimmed = lemma.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.is_empty() {
        lemma
    } else {
        trimmed
    }
}
