//! Archive metadata parsing.
//!
//! The metadata file is UTF-8 text with one `key=value` pair per line.
//! Lines without `=` (such as a leading magic line) are skipped and
//! trailing carriage returns are stripped.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::{debug, trace, warn};

use crate::dict::format::open_archive_file;
use crate::dict::types::error::Result;
use crate::dict::types::models::Metadata;
use crate::dict::utils;

/// Key holding the dictionary's display title.
pub const TITLE_KEY: &str = "bookname";
/// Declared number of index records.
pub const WORD_COUNT_KEY: &str = "wordcount";
/// Declared byte length of the index file.
pub const INDEX_SIZE_KEY: &str = "idxfilesize";

/// Reads and parses the metadata file at `path`.
///
/// `fallback_title` is used when the file has no `bookname` key.
pub fn parse(path: &Path, fallback_title: &str) -> Result<Metadata> {
    debug!("Parsing metadata file {}", path.display());
    let mut file = open_archive_file(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    let text = utils::decode_utf8(&bytes, || format!("metadata file {}", path.display()))?;
    Ok(parse_str(&text, fallback_title))
}

/// Parses metadata text that has already been decoded.
pub fn parse_str(text: &str, fallback_title: &str) -> Metadata {
    let mut fields = HashMap::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        let Some((key, value)) = line.split_once('=') else {
            trace!("Skipping metadata line without '=': {:?}", line);
            continue;
        };
        fields.insert(key.trim().to_string(), value.trim().to_string());
    }

    let title = match fields.get(TITLE_KEY) {
        Some(title) if !title.is_empty() => title.clone(),
        _ => {
            warn!(
                "Metadata has no '{}' key, using '{}' as title",
                TITLE_KEY, fallback_title
            );
            fallback_title.to_string()
        }
    };

    Metadata { title, fields }
}

/// Parses a declared numeric field, ignoring values that are not numbers.
pub fn declared_number(metadata: &Metadata, key: &str) -> Option<u64> {
    let raw = metadata.get(key)?;
    match raw.parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!("Ignoring non-numeric metadata value {}={:?}", key, raw);
            None
        }
    }
}
