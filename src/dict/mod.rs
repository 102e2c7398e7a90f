//! Dictionary archives, lookup and paging.
//!
//! # Module Organization
//!
//! - [`types`]: errors and shared models
//! - [`format`]: parsing of the metadata, index and corpus files
//! - [`search`]: query normalization and match resolution
//! - [`render`]: entry formatting into display lines
//! - [`pager`]: the scrollable window and in-window search
//! - [`config`]: session options
//! - [`loader`]: concurrent opening of several archives
//! - [`session`]: the query/scroll front end tying it together
//!
//! ```text
//! Session ──search──▶ resolver ──ids──▶ Dictionary::render_entry ──▶ PagedBuffer
//!    │                                        ▲                          │
//!    └──scroll/repeat/jump────────────────────┴──── lazy load (view) ◀───┘
//! ```

pub mod config;
pub mod format;
pub mod loader;
pub mod pager;
pub mod render;
pub mod search;
pub mod session;
pub mod types;
pub(crate) mod utils;

use std::path::Path;

use log::info;

use format::corpus::CorpusReader;
use format::index::IndexCatalog;
use pager::EntrySource;
use render::Layout;
use types::error::{DictError, Result};
use types::models::{ArchivePaths, Entry, MatchKind, Metadata, RenderedEntry};

pub use config::{PagerConfig, SearchModes};
pub use session::Session;

/// One opened archive: metadata, the in-memory catalog and a handle on the
/// corpus file.
#[derive(Debug)]
pub struct Dictionary {
    pub name: String,
    pub metadata: Metadata,
    pub catalog: IndexCatalog,
    corpus: CorpusReader,
}

impl Dictionary {
    /// Opens the archive whose files share the base path `base`.
    ///
    /// # Errors
    /// - `MissingFile` if any of the three files is absent
    /// - `MalformedIndex` if the index is broken or an entry points past the
    ///   end of the corpus
    /// - `Decode` if the metadata or a lemma is not valid UTF-8
    pub fn open(name: impl Into<String>, base: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let paths = ArchivePaths::from_base(base);
        info!("Opening dictionary '{}' from {}", name, paths.index.display());

        let (metadata, catalog) = IndexCatalog::load(&paths.metadata, &paths.index)?;
        let corpus = CorpusReader::open(&paths.corpus)?;
        catalog.validate_extents(corpus.len())?;

        Ok(Self {
            name,
            metadata,
            catalog,
            corpus,
        })
    }

    /// Display title from the metadata.
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn entry_count(&self) -> usize {
        self.catalog.count()
    }

    /// Returns a copy of entry `id` with its corpus text read in.
    pub fn entry_with_corpus(&self, id: usize) -> Result<Entry> {
        let mut entry = self.lookup(id)?.clone();
        entry.corpus = Some(self.corpus.read(entry.offset, entry.length)?);
        Ok(entry)
    }

    /// Reads and renders entry `id`.
    pub fn render_entry(&self, id: usize, layout: &Layout, kind: MatchKind) -> Result<RenderedEntry> {
        let entry = self.lookup(id)?;
        let text = self.corpus.read(entry.offset, entry.length)?;
        Ok(render::render(entry, &text, self.title(), layout, kind))
    }

    /// An [`EntrySource`] that renders lazily loaded neighbours as
    /// best-effort entries.
    pub fn view<'a>(&'a self, layout: &'a Layout, regex: bool) -> DictionaryView<'a> {
        DictionaryView {
            dict: self,
            layout,
            regex,
        }
    }

    fn lookup(&self, id: usize) -> Result<&Entry> {
        self.catalog.get(id).ok_or_else(|| {
            DictError::MalformedIndex(format!(
                "entry id {} out of range for '{}' ({} entries)",
                id,
                self.name,
                self.catalog.count()
            ))
        })
    }
}

/// Borrowed rendering context handed to the buffer for lazy loads.
pub struct DictionaryView<'a> {
    dict: &'a Dictionary,
    layout: &'a Layout,
    regex: bool,
}

impl EntrySource for DictionaryView<'_> {
    fn count(&self) -> usize {
        self.dict.entry_count()
    }

    fn load(&self, id: usize) -> Result<RenderedEntry> {
        self.dict
            .render_entry(id, self.layout, MatchKind::BestEffort { regex: self.regex })
    }
}
