//! Renders an entry into a title block and word-wrapped body lines.
//!
//! ```text
//! ==================== separator (char picked by MatchKind)
//!      Dictionary title
//!          lemma
//! ====================
//!   lemma, first paragraph of the corpus text wrapped
//!   at width - right_margin columns
//!       after an explicit line break, a deeper indent
//! ```

use crate::dict::render::markup;
use crate::dict::types::models::{Entry, MatchKind, RenderedEntry};

/// Extra indentation applied after an explicit line break.
pub const CONTINUATION_INDENT: usize = 4;

const ELLIPSIS: &str = "...";

/// Column geometry for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: usize,
    pub left_margin: usize,
    pub right_margin: usize,
    pub show_header: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: 80,
            left_margin: 2,
            right_margin: 2,
            show_header: true,
        }
    }
}

/// Renders `entry` with its corpus text.
///
/// `title` is the dictionary's display title shown in the header.
pub fn render(
    entry: &Entry,
    corpus: &str,
    title: &str,
    layout: &Layout,
    kind: MatchKind,
) -> RenderedEntry {
    let title_lines = if layout.show_header {
        title_block(title, &entry.lemma, layout.width, kind)
    } else {
        Vec::new()
    };
    let text = format!("{}, {}", entry.lemma, corpus);
    RenderedEntry {
        source_id: entry.id,
        title_lines,
        body_lines: wrap_body(&text, layout),
    }
}

fn title_block(title: &str, lemma: &str, width: usize, kind: MatchKind) -> Vec<String> {
    let separator: String = std::iter::repeat(kind.separator()).take(width).collect();
    vec![
        separator.clone(),
        center(title, width),
        center(lemma, width),
        separator,
    ]
}

/// Centers `text` in `width` columns, truncating it with an ellipsis when
/// it does not fit.
pub fn center(text: &str, width: usize) -> String {
    let text = if markup::visible_len(text) > width {
        let mut cut = markup::truncate_visible(text, width.saturating_sub(ELLIPSIS.len()));
        cut.push_str(ELLIPSIS);
        cut
    } else {
        text.to_string()
    };
    let pad = width.saturating_sub(markup::visible_len(&text)) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Word-wraps `text` to `width - right_margin` columns.
///
/// Each `\n` starts a new paragraph indented by `left_margin +
/// CONTINUATION_INDENT`; the first paragraph is indented by `left_margin`.
pub fn wrap_body(text: &str, layout: &Layout) -> Vec<String> {
    let limit = layout.width.saturating_sub(layout.right_margin);
    let normalized = text.replace("\r\n", "\n");
    let mut lines = Vec::new();

    for (i, paragraph) in normalized.trim_end().split('\n').enumerate() {
        let indent = if i == 0 {
            layout.left_margin
        } else {
            layout.left_margin + CONTINUATION_INDENT
        };
        let available = limit.saturating_sub(indent).max(1);
        wrap_paragraph(paragraph, &" ".repeat(indent), available, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, pad: &str, available: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;
    let mut any_word = false;

    for word in paragraph.split_whitespace() {
        any_word = true;
        let word_len = markup::visible_len(word);

        if word_len > available {
            if !current.is_empty() {
                lines.push(format!("{}{}", pad, current));
            }
            let mut chunks = markup::split_visible(word, available);
            let last = chunks.pop().unwrap_or_default();
            lines.extend(chunks.into_iter().map(|c| format!("{}{}", pad, c)));
            current_len = markup::visible_len(&last);
            current = last;
        } else if current.is_empty() {
            current = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= available {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(format!("{}{}", pad, current));
            current = word.to_string();
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(format!("{}{}", pad, current));
    } else if !any_word {
        lines.push(String::new());
    }
}
