//! # Query Resolution
//!
//! Turns a query string into exact (or pattern) matches, or failing that a
//! single nearest entry.
//!
//! The catalog is scanned in its stored order. While nothing has matched, a
//! nearest candidate is tracked with a streaming longest-common-prefix
//! comparison:
//!
//! 1. A candidate sharing a longer prefix with the query than the current
//!    best becomes the nearest, and the best length grows to that prefix.
//! 2. A candidate sharing exactly the best length replaces the nearest when
//!    its next `char` sorts before the query's next `char` and after the
//!    current nearest's, so the closest preceding entry wins.
//!
//! Comparisons are by Unicode scalar value after normalization.

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::dict::format::index::IndexCatalog;
use crate::dict::search::normalize::Normalizer;
use crate::dict::types::models::Entry;

/// Options for one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub normalize_diacritics: bool,
    pub fold_case: bool,
    pub as_regex: bool,
    /// `None` means unbounded.
    pub max_matches: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            normalize_diacritics: true,
            fold_case: true,
            as_regex: false,
            max_matches: None,
        }
    }
}

impl SearchOptions {
    fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.normalize_diacritics, self.fold_case)
    }
}

/// A compiled query.
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

impl Pattern {
    /// Compiles `query` once. A malformed regex degrades to a literal.
    ///
    /// With `fold_case` a regex is compiled case-insensitively; its source
    /// must not be lowercased (`\D` is not `\d`).
    pub fn compile(query: &str, as_regex: bool, fold_case: bool) -> Self {
        let literal = || {
            if fold_case {
                Pattern::Literal(query.to_lowercase())
            } else {
                Pattern::Literal(query.to_string())
            }
        };
        if !as_regex {
            return literal();
        }
        match RegexBuilder::new(query).case_insensitive(fold_case).build() {
            Ok(re) => Pattern::Regex(re),
            Err(e) => {
                warn!("Invalid pattern {:?}, matching literally: {}", query, e);
                literal()
            }
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Pattern::Literal(text) => text == candidate,
            Pattern::Regex(re) => re.is_match(candidate),
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Pattern::Regex(_))
    }
}

/// Outcome of [`resolve`]. `nearest` is only set when `matches` is empty.
#[derive(Debug, Clone, Default)]
pub struct Resolution<'a> {
    pub matches: Vec<&'a Entry>,
    pub nearest: Option<&'a Entry>,
}

impl Resolution<'_> {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.nearest.is_none()
    }

    /// Ids of the matched entries in catalog order.
    pub fn match_ids(&self) -> Vec<usize> {
        self.matches.iter().map(|e| e.id).collect()
    }
}

/// Streaming nearest-hit state.
struct NearestTracker<'a> {
    best_len: usize,
    nearest: Option<(&'a Entry, Vec<char>)>,
}

impl<'a> NearestTracker<'a> {
    fn new() -> Self {
        Self {
            best_len: 0,
            nearest: None,
        }
    }

    fn offer(&mut self, entry: &'a Entry, lemma: &str, query: &[char]) {
        let candidate: Vec<char> = lemma.chars().collect();
        let shared = candidate
            .iter()
            .zip(query)
            .take_while(|(a, b)| a == b)
            .count();

        if shared > self.best_len {
            self.best_len = shared;
            self.nearest = Some((entry, candidate));
            return;
        }
        if shared < self.best_len {
            return;
        }

        let (Some(&next), Some(&wanted)) = (candidate.get(shared), query.get(shared)) else {
            return;
        };
        let closer = match &self.nearest {
            Some((_, current)) => current.get(shared).map_or(true, |&c| next > c),
            None => true,
        };
        if next < wanted && closer {
            self.nearest = Some((entry, candidate));
        }
    }

    fn into_entry(self) -> Option<&'a Entry> {
        self.nearest.map(|(entry, _)| entry)
    }
}

/// Resolves `raw_query` against `catalog`.
///
/// The digit suffix is stripped from lemmas only, never from the query.
/// An empty query resolves to nothing.
pub fn resolve<'a>(
    catalog: &'a IndexCatalog,
    raw_query: &str,
    options: &SearchOptions,
) -> Resolution<'a> {
    let normalizer = options.normalizer();
    let query = normalizer.apply(raw_query);
    if query.is_empty() {
        return Resolution::default();
    }
    let source = if options.as_regex {
        Normalizer::new(options.normalize_diacritics, false).apply(raw_query)
    } else {
        query.clone()
    };
    let pattern = Pattern::compile(&source, options.as_regex, options.fold_case);
    let query_chars: Vec<char> = query.chars().collect();

    let mut matches = Vec::new();
    let mut tracker = Some(NearestTracker::new());

    for entry in catalog.all() {
        let lemma = normalizer.lemma(&entry.lemma);
        if pattern.matches(&lemma) {
            matches.push(entry);
            tracker = None;
            if options.max_matches.map_or(false, |max| matches.len() >= max) {
                break;
            }
        } else if let Some(tracker) = tracker.as_mut() {
            tracker.offer(entry, &lemma, &query_chars);
        }
    }

    let nearest = tracker.and_then(NearestTracker::into_entry);
    debug!(
        "Resolved {:?}: {} matches, nearest={:?}",
        raw_query,
        matches.len(),
        nearest.map(|e| e.id)
    );
    Resolution { matches, nearest }
}
