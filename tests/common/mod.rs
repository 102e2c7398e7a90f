#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dict_pager::dict::types::models::ArchivePaths;
use tempfile::TempDir;

/// Writes a three-file archive into a temporary directory.
pub struct ArchiveBuilder {
    title: Option<String>,
    entries: Vec<(String, String)>,
    extra_meta: Vec<(String, String)>,
}

impl ArchiveBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            entries: Vec::new(),
            extra_meta: Vec::new(),
        }
    }

    pub fn untitled() -> Self {
        Self {
            title: None,
            entries: Vec::new(),
            extra_meta: Vec::new(),
        }
    }

    pub fn entry(mut self, lemma: &str, text: &str) -> Self {
        self.entries.push((lemma.to_string(), text.to_string()));
        self
    }

    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.extra_meta.push((key.to_string(), value.to_string()));
        self
    }

    /// Index bytes with corpus offsets in entry order.
    pub fn index_bytes(&self) -> Vec<u8> {
        let mut index = Vec::new();
        let mut offset = 0u32;
        for (lemma, text) in &self.entries {
            index.extend_from_slice(lemma.as_bytes());
            index.push(0);
            index.extend_from_slice(&offset.to_be_bytes());
            index.extend_from_slice(&(text.len() as u32).to_be_bytes());
            offset += text.len() as u32;
        }
        index
    }

    pub fn corpus_bytes(&self) -> Vec<u8> {
        self.entries
            .iter()
            .flat_map(|(_, text)| text.as_bytes().to_vec())
            .collect()
    }

    pub fn metadata_text(&self) -> String {
        let mut text = String::from("StarDict's dict ifo file\nversion=2.4.2\n");
        if let Some(title) = &self.title {
            text.push_str(&format!("bookname={}\n", title));
        }
        for (key, value) in &self.extra_meta {
            text.push_str(&format!("{}={}\r\n", key, value));
        }
        text
    }

    /// Writes `<dir>/<stem>.{ifo,idx,dict}` and returns the base path.
    ///
    /// The extensions are appended, so a dotted stem such as `en.v2` keeps
    /// its full name.
    pub fn write_to(&self, dir: &Path, stem: &str) -> PathBuf {
        let base = dir.join(stem);
        let paths = ArchivePaths::from_base(&base);
        fs::write(&paths.metadata, self.metadata_text()).unwrap();
        fs::write(&paths.index, self.index_bytes()).unwrap();
        fs::write(&paths.corpus, self.corpus_bytes()).unwrap();
        base
    }

    /// Writes into a fresh temporary directory that lives as long as the
    /// returned guard.
    pub fn build(&self, stem: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let base = self.write_to(dir.path(), stem);
        (dir, base)
    }
}

/// The four-entry archive used across the lookup tests.
pub fn animals() -> ArchiveBuilder {
    ArchiveBuilder::new("Animals")
        .entry("cat", "a small <b>feline</b>")
        .entry("dog", "a loyal canine")
        .entry("doge", "a Venetian magistrate")
        .entry("zeal", "great energy")
}

/// Letter-only lemma for entry `i`: `aa`, `ab`, ... `az`, `ba`, ...
///
/// Digits are avoided because a trailing number reads as a homograph suffix.
pub fn word(i: usize) -> String {
    let first = (b'a' + (i / 26) as u8) as char;
    let second = (b'a' + (i % 26) as u8) as char;
    format!("{}{}", first, second)
}

/// `count` entries in catalog order with one short line of text each.
pub fn numbered(count: usize) -> ArchiveBuilder {
    (0..count).fold(ArchiveBuilder::new("Numbered"), |b, i| {
        b.entry(&word(i), &format!("entry number {}", i))
    })
}
