//! Inline emphasis markers.
//!
//! Entry text may wrap spans in zero-width tags: `<b>`/`</b>` (bold),
//! `<i>`/`</i>` (italic), `<t>`/`</t>` (title), and `<f>`, `<f=NAME>`, `</f>`
//! (font change). They are kept in rendered lines for the terminal layer
//! but never count toward column widths.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

static MARKER_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Returns the cached marker regex.
pub fn marker_regex() -> &'static Regex {
    MARKER_PATTERN.get_or_init(|| {
        Regex::new(r"</?[bitf]>|<f=[^<>]*>").expect("Invalid emphasis marker pattern")
    })
}

/// Removes every marker from `text`.
pub fn strip_markers(text: &str) -> Cow<'_, str> {
    marker_regex().replace_all(text, "")
}

/// Number of `char`s in `text` excluding markers.
pub fn visible_len(text: &str) -> usize {
    let marker_chars: usize = marker_regex()
        .find_iter(text)
        .map(|m| m.as_str().chars().count())
        .sum();
    text.chars().count() - marker_chars
}

/// A piece of marked-up text: either a marker or one visible character.
enum Piece<'a> {
    Marker(&'a str),
    Visible(char),
}

fn pieces(text: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in marker_regex().find_iter(text) {
        out.extend(text[last..m.start()].chars().map(Piece::Visible));
        out.push(Piece::Marker(m.as_str()));
        last = m.end();
    }
    out.extend(text[last..].chars().map(Piece::Visible));
    out
}

/// Splits `text` into chunks of at most `max` visible characters.
///
/// Markers stay attached to the chunk they occur in. `max` of zero is
/// treated as one.
pub fn split_visible(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut visible = 0;
    for piece in pieces(text) {
        match piece {
            Piece::Marker(tag) => current.push_str(tag),
            Piece::Visible(c) => {
                if visible == max {
                    chunks.push(std::mem::take(&mut current));
                    visible = 0;
                }
                current.push(c);
                visible += 1;
            }
        }
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Keeps the first `max` visible characters of `text` (and markers among them).
pub fn truncate_visible(text: &str, max: usize) -> String {
    let mut out = String::new();
    let mut visible = 0;
    for piece in pieces(text) {
        match piece {
            Piece::Marker(tag) => out.push_str(tag),
            Piece::Visible(_) if visible == max => break,
            Piece::Visible(c) => {
                out.push(c);
                visible += 1;
            }
        }
    }
    out
}
