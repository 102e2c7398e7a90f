//! # Index Catalog
//!
//! Parses the binary index file into an ordered, id-addressed entry table.
//!
//! ## Record layout
//! ```text
//! [N bytes] lemma (UTF-8)
//! [1 byte ] 0x00 terminator
//! [4 bytes] corpus offset (big-endian u32)
//! [4 bytes] corpus length (big-endian u32)
//! ```
//!
//! A record's ordinal position is its `id`. The catalog keeps the on-disk
//! order because the nearest-hit heuristic streams over it.

use std::io::Read;
use std::path::Path;

use log::{info, trace, warn};

use crate::dict::format::{metadata, open_archive_file};
use crate::dict::types::error::{DictError, Result};
use crate::dict::types::models::{Entry, Metadata};
use crate::dict::utils;

/// Ordered, read-only table of index entries.
#[derive(Debug, Clone, Default)]
pub struct IndexCatalog {
    entries: Vec<Entry>,
}

impl IndexCatalog {
    /// Loads the metadata and index files of one archive.
    ///
    /// The index is decoded strictly: one bad lemma aborts the whole load,
    /// since a truncated catalog would misreport ids.
    ///
    /// # Errors
    /// - `MissingFile` if either file is absent
    /// - `MalformedIndex` if a record is truncated or `idxfilesize` disagrees
    /// - `Decode` if a lemma is not valid UTF-8
    pub fn load(metadata_path: &Path, index_path: &Path) -> Result<(Metadata, Self)> {
        let fallback_title = metadata_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = metadata::parse(metadata_path, &fallback_title)?;

        info!("Loading index {}", index_path.display());
        let mut file = open_archive_file(index_path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        if let Some(declared) = metadata::declared_number(&meta, metadata::INDEX_SIZE_KEY) {
            if declared != bytes.len() as u64 {
                return Err(DictError::MalformedIndex(format!(
                    "index file is {} bytes but metadata declares {}",
                    bytes.len(),
                    declared
                )));
            }
        }

        let catalog = Self::parse(&bytes)?;

        if let Some(declared) = metadata::declared_number(&meta, metadata::WORD_COUNT_KEY) {
            if declared != catalog.count() as u64 {
                warn!(
                    "Metadata declares {} entries but index holds {}",
                    declared,
                    catalog.count()
                );
            }
        }

        info!(
            "Index loaded: '{}' with {} entries",
            meta.title,
            catalog.count()
        );
        Ok((meta, catalog))
    }

    /// Parses raw index bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut reader = data;

        while !reader.is_empty() {
            let id = entries.len();
            let lemma = read_lemma(&mut reader, id)?;
            let offset = utils::read_u32(&mut reader, "offset")?;
            let length = utils::read_u32(&mut reader, "length")?;
            trace!("Record {}: {:?} at {}+{}", id, lemma, offset, length);
            entries.push(Entry {
                id,
                lemma,
                offset,
                length,
                corpus: None,
            });
        }

        Ok(Self { entries })
    }

    /// Checks every entry's extent against the corpus file length.
    pub fn validate_extents(&self, corpus_len: u64) -> Result<()> {
        match self.entries.iter().find(|e| e.extent_end() > corpus_len) {
            Some(entry) => Err(DictError::MalformedIndex(format!(
                "entry {} ({:?}) spans {}..{} past corpus end {}",
                entry.id,
                entry.lemma,
                entry.offset,
                entry.extent_end(),
                corpus_len
            ))),
            None => Ok(()),
        }
    }

    pub fn get(&self, id: usize) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads a NUL-terminated UTF-8 lemma and advances past the terminator.
fn read_lemma(reader: &mut &[u8], id: usize) -> Result<String> {
    let end = reader.iter().position(|&b| b == 0).ok_or_else(|| {
        DictError::MalformedIndex(format!("record {} has no lemma terminator", id))
    })?;
    let lemma = utils::decode_utf8(&reader[..end], || format!("lemma of record {}", id))?;
    *reader = &reader[end + 1..];
    Ok(lemma)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lemma: &str, offset: u32, length: u32) -> Vec<u8> {
        let mut bytes = lemma.as_bytes().to_vec();
        bytes.push(0);
        bytes.extend_from_slice(&offset.to_be_bytes());
        bytes.extend_from_slice(&length.to_be_bytes());
        bytes
    }

    #[test]
    fn assigns_ids_in_file_order() {
        let mut data = record("zeal", 0, 4);
        data.extend(record("cat", 4, 3));
        let catalog = IndexCatalog::parse(&data).unwrap();
        assert_eq!(catalog.count(), 2);
        let first = catalog.get(0).unwrap();
        assert_eq!((first.id, first.lemma.as_str()), (0, "zeal"));
        let second = catalog.get(1).unwrap();
        assert_eq!((second.id, second.offset, second.length), (1, 4, 3));
        assert!(second.corpus.is_none());
    }

    #[test]
    fn empty_index_is_an_empty_catalog() {
        let catalog = IndexCatalog::parse(&[]).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn missing_terminator_is_malformed() {
        let result = IndexCatalog::parse(b"abc");
        assert!(matches!(result, Err(DictError::MalformedIndex(_))));
    }

    #[test]
    fn short_trailer_is_malformed() {
        let mut data = record("cat", 0, 3);
        data.truncate(data.len() - 2);
        assert!(matches!(
            IndexCatalog::parse(&data),
            Err(DictError::MalformedIndex(_))
        ));
    }

    #[test]
    fn invalid_lemma_aborts_the_load() {
        let mut data = record("ok", 0, 1);
        data.extend_from_slice(&[0xff, 0xfe, 0]);
        data.extend_from_slice(&[0; 8]);
        assert!(matches!(
            IndexCatalog::parse(&data),
            Err(DictError::Decode { .. })
        ));
    }

    #[test]
    fn extents_past_corpus_end_are_rejected() {
        let catalog = IndexCatalog::parse(&record("cat", 10, 5)).unwrap();
        assert!(catalog.validate_extents(15).is_ok());
        assert!(matches!(
            catalog.validate_extents(14),
            Err(DictError::MalformedIndex(_))
        ));
    }
}
