//! # dict-pager
//!
//! Looks up headwords in indexed dictionary archives and pages through the
//! rendered entries.
//!
//! An archive is three files sharing a base name: `<base>.ifo` (metadata),
//! `<base>.idx` (sorted headword index) and `<base>.dict` (entry text).
//! Queries are matched exactly, by regex, or by a nearest-headword fallback,
//! after optional diacritic and case folding.
pub mod dict;

// Re-export the main types for convenience
pub use dict::{
    config::{PagerConfig, SearchModes},
    loader::{open_all, ArchiveSpec},
    pager::{Position, Snapshot, Span},
    render::Layout,
    session::Session,
    types::{
        error::{DictError, Result},
        models::{Entry, MatchKind, Metadata, RenderedEntry},
    },
    Dictionary,
};
