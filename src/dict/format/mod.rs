//! File format parsing layer for dictionary archives.
//!
//! This module bridges raw file I/O and the high-level
//! [`Dictionary`](crate::dict::Dictionary).
//!
//! # Module Organization
//!
//! - [`metadata`]: Parses the `key=value` metadata file
//! - [`index`]: Parses the binary index into an id-addressed catalog
//! - [`corpus`]: Positioned reads of entry text from the corpus file
//!
//! # Architecture
//!
//! ```text
//! Archive:
//! ┌─────────────────┐
//! │  <base>.ifo     │ ← metadata::parse()
//! ├─────────────────┤
//! │  <base>.idx     │ ← IndexCatalog::load()
//! │  lemma\0 off len│
//! ├─────────────────┤
//! │  <base>.dict    │ ← CorpusReader::read()
//! │  (entry text)   │
//! └─────────────────┘
//! ```

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::dict::types::error::{DictError, Result};

pub mod corpus;
pub mod index;
pub mod metadata;

/// Open an archive file, reporting an absent file as `MissingFile`.
pub(crate) fn open_archive_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DictError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => DictError::Io(e),
    })
}
