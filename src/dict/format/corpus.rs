//! Random-access reads of entry text from the corpus file.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

use log::{info, trace};

use crate::dict::format::open_archive_file;
use crate::dict::types::error::{DictError, Result};
use crate::dict::utils;

/// Holds the corpus file handle and materializes entry text on demand.
///
/// Reads are independent of each other and may happen in any order.
#[derive(Debug)]
pub struct CorpusReader {
    file: Mutex<File>,
    len: u64,
}

impl CorpusReader {
    pub fn open(path: &Path) -> Result<Self> {
        info!("Opening corpus {}", path.display());
        let file = open_archive_file(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            file: Mutex::new(file),
            len,
        })
    }

    /// Length of the corpus file in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads exactly `length` bytes at `offset` and decodes them as UTF-8.
    ///
    /// # Errors
    /// - `Io` if the seek or read fails (including a short read)
    /// - `Decode` if the bytes are not valid UTF-8
    pub fn read(&self, offset: u32, length: u32) -> Result<String> {
        trace!("Reading corpus slice {}+{}", offset, length);
        let mut buf = vec![0u8; length as usize];
        {
            let mut file = self.file.lock().map_err(|_| DictError::LockPoisoned)?;
            file.seek(SeekFrom::Start(offset as u64))?;
            file.read_exact(&mut buf)?;
        }
        utils::decode_utf8(&buf, || format!("corpus slice {}+{}", offset, length))
    }
}
