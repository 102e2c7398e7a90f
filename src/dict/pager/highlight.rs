//! Highlight spans for a term over the displayed lines.
//!
//! The term and each line are diacritic-stripped and case-folded before
//! matching. Columns are reported in `char`s of the line as the terminal
//! shows it, which is with markers removed unless raw matching is asked for.

use log::warn;
use regex::{Regex, RegexBuilder};

use crate::dict::render::markup;
use crate::dict::search::normalize::Normalizer;

/// One match: `line` indexes the displayed lines, `start..end` are columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

/// How to interpret the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleSearch {
    pub as_regex: bool,
    /// Match against lines with markers left in.
    pub raw: bool,
}

/// `term` keeps its case; matching is case-insensitive.
fn compile(term: &str, as_regex: bool) -> Option<Regex> {
    if as_regex {
        match RegexBuilder::new(term).case_insensitive(true).build() {
            Ok(re) => return Some(re),
            Err(e) => warn!("Invalid highlight pattern {:?}, matching literally: {}", term, e),
        }
    }
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Finds every non-overlapping match of `term` in `lines`.
pub fn find_spans(lines: &[String], term: &str, options: VisibleSearch) -> Vec<Span> {
    let normalizer = Normalizer::full();
    let term = Normalizer::new(true, false).apply(term);
    if term.is_empty() {
        return Vec::new();
    }
    let Some(pattern) = compile(&term, options.as_regex) else {
        return Vec::new();
    };

    let mut spans = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let shown = if options.raw {
            line.clone()
        } else {
            markup::strip_markers(line).into_owned()
        };
        let (folded, origins) = normalizer.apply_with_origins(&shown);
        for m in pattern.find_iter(&folded) {
            if m.as_str().is_empty() {
                continue;
            }
            let first = folded[..m.start()].chars().count();
            let last = first + m.as_str().chars().count() - 1;
            spans.push(Span {
                line: idx,
                start: origins[first],
                end: origins[last] + 1,
            });
        }
    }
    spans
}
