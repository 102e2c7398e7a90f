//! Core data structures shared across the archive, search and paging layers.
//!
//! This module defines:
//! - Archive file locations and parsed metadata
//! - Index entries and rendered entries
//! - Match classification used by the formatter

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Extension of the `key=value` metadata file.
pub const METADATA_EXT: &str = "ifo";
/// Extension of the binary index file.
pub const INDEX_EXT: &str = "idx";
/// Extension of the corpus file.
pub const CORPUS_EXT: &str = "dict";

/// Locations of the three files forming one archive.
///
/// All three share a base name in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePaths {
    pub metadata: PathBuf,
    pub index: PathBuf,
    pub corpus: PathBuf,
}

impl ArchivePaths {
    /// Derives the three file paths from a base path such as `dicts/english`.
    pub fn from_base(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let with_ext = |ext: &str| {
            let mut name = base.as_os_str().to_owned();
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        };
        Self {
            metadata: with_ext(METADATA_EXT),
            index: with_ext(INDEX_EXT),
            corpus: with_ext(CORPUS_EXT),
        }
    }
}

/// Parsed archive metadata.
///
/// Only the title is interpreted; every other key is retained verbatim.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: String,
    pub fields: HashMap<String, String>,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// A single record of the index.
///
/// `id` is the record's ordinal position in the index file and is the only
/// handle used for re-lookup. `corpus` stays `None` until the text is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: usize,
    pub lemma: String,
    pub offset: u32,
    pub length: u32,
    pub corpus: Option<String>,
}

impl Entry {
    /// Byte position one past the entry's last corpus byte.
    pub fn extent_end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }
}

/// How an entry came to be displayed, which selects its separator line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Strict { regex: bool },
    BestEffort { regex: bool },
}

impl MatchKind {
    pub fn new(strict: bool, regex: bool) -> Self {
        if strict {
            MatchKind::Strict { regex }
        } else {
            MatchKind::BestEffort { regex }
        }
    }

    /// Character used to draw the title block separators.
    pub fn separator(&self) -> char {
        match self {
            MatchKind::Strict { regex: false } => '=',
            MatchKind::Strict { regex: true } => '#',
            MatchKind::BestEffort { regex: false } => '-',
            MatchKind::BestEffort { regex: true } => '~',
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchKind::Strict { regex: false } => write!(f, "strict"),
            MatchKind::Strict { regex: true } => write!(f, "strict regex"),
            MatchKind::BestEffort { regex: false } => write!(f, "best-effort"),
            MatchKind::BestEffort { regex: true } => write!(f, "best-effort regex"),
        }
    }
}

/// An entry rendered into display lines. Immutable once produced.
///
/// Lines still carry inline emphasis markers for the terminal layer to style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub source_id: usize,
    pub title_lines: Vec<String>,
    pub body_lines: Vec<String>,
}

impl RenderedEntry {
    pub fn has_header(&self) -> bool {
        !self.title_lines.is_empty()
    }

    /// Title block followed by the body.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.title_lines
            .iter()
            .chain(self.body_lines.iter())
            .map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.title_lines.len() + self.body_lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_paths_append_extensions() {
        let paths = ArchivePaths::from_base("dicts/en.v2");
        assert_eq!(paths.metadata, PathBuf::from("dicts/en.v2.ifo"));
        assert_eq!(paths.index, PathBuf::from("dicts/en.v2.idx"));
        assert_eq!(paths.corpus, PathBuf::from("dicts/en.v2.dict"));
    }

    #[test]
    fn separators_distinguish_all_match_kinds() {
        let chars: Vec<char> = [(true, false), (true, true), (false, false), (false, true)]
            .iter()
            .map(|&(strict, regex)| MatchKind::new(strict, regex).separator())
            .collect();
        assert_eq!(chars, vec!['=', '#', '-', '~']);
    }
}
