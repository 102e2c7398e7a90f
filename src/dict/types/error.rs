//! Custom error types for the dict-pager crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// An empty search result is not an error; lookups that can come back
/// empty return `Option` or an empty collection instead.
#[derive(Debug, Error)]
pub enum DictError {
    /// One of the three archive files (metadata, index, corpus) is absent.
    #[error("Missing archive file: {}", path.display())]
    MissingFile { path: PathBuf },

    /// The index framing is broken or points outside the corpus file.
    #[error("Malformed index: {0}")]
    MalformedIndex(String),

    /// A lemma or corpus slice is not valid UTF-8.
    #[error("UTF-8 decode error in {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// An error originating from I/O on an already-open file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration option is unknown or has an unusable value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The corpus file mutex was poisoned by a panic in another thread.
    #[error("Corpus file lock was poisoned")]
    LockPoisoned,
}

impl DictError {
    /// Wraps a UTF-8 failure with a short description of what was being decoded.
    pub fn decode(context: impl Into<String>, source: std::str::Utf8Error) -> Self {
        DictError::Decode {
            context: context.into(),
            source,
        }
    }
}

/// A convenience `Result` type alias using the crate's `DictError` type.
pub type Result<T> = std::result::Result<T, DictError>;
