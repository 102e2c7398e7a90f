//! Scrollable window over rendered entries and in-window search.
//!
//! - [`buffer`]: the paged window with lazy loading
//! - [`highlight`]: match spans over the currently displayed lines

pub mod buffer;
pub mod highlight;

use crate::dict::types::error::Result;
use crate::dict::types::models::RenderedEntry;

pub use buffer::{PagedBuffer, Snapshot, DEFAULT_ENTRY_LOAD};
pub use highlight::{find_spans, Span, VisibleSearch};

/// A display unit address: an index into the loaded entries and a unit
/// within that entry (0 is the title block, `1..` are body lines).
///
/// `entry == loaded.len()` with `line == 0` means "after the last entry".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Position {
    pub entry: usize,
    pub line: usize,
}

impl Position {
    pub fn new(entry: usize, line: usize) -> Self {
        Self { entry, line }
    }
}

/// Supplies rendered entries to the buffer when it lazy-loads.
pub trait EntrySource {
    /// Number of ids available, `0..count()`.
    fn count(&self) -> usize;

    /// Reads and renders the entry with the given id.
    fn load(&self, id: usize) -> Result<RenderedEntry>;
}
