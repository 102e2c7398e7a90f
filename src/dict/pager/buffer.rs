//! # Paged Buffer
//!
//! A scrollable window over rendered entries.
//!
//! Every loaded entry is a run of display units: unit 0 is its whole title
//! block (only when it has one) and units `1..=body.len()` are body lines.
//! The window is the half-open unit range `[start, end)`.
//!
//! ```text
//! loaded:  [ e0: hdr 1 2 3 ][ e1: hdr 1 2 ][ e2: hdr 1 2 3 4 ]
//!                   ^start                        ^end
//! ```
//!
//! When a walk runs off either edge of `loaded` and lazy loading is on, the
//! next (or previous) block of catalog ids is rendered through the
//! [`EntrySource`] and appended (or prepended). Prepending shifts the
//! stored positions so they keep addressing the same units. A [`Snapshot`]
//! remembers the first loaded id it was taken against, so restoring it after
//! a prepend applies the same shift.

use log::{debug, warn};

use super::{EntrySource, Position};
use crate::dict::types::models::RenderedEntry;

/// Default number of entries pulled in by one lazy load.
pub const DEFAULT_ENTRY_LOAD: usize = 20;

/// Result of walking the units in one direction.
struct Walk {
    lines: Vec<String>,
    /// First unit of the walked range.
    first: Position,
    /// Unit after the last one of the walked range.
    end: Position,
    units: usize,
}

/// A saved window, taken with [`PagedBuffer::snapshot`].
///
/// `start` and `end` index the entries loaded at the time; `restore`
/// remaps them if earlier entries were prepended since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub start: Position,
    pub end: Position,
    first_id: Option<usize>,
    generation: u64,
}

/// A scrollable window of rendered entries that lazy-loads at both edges.
#[derive(Debug, Clone)]
pub struct PagedBuffer {
    loaded: Vec<RenderedEntry>,
    start: Position,
    end: Position,
    first_loaded_id: Option<usize>,
    last_loaded_id: Option<usize>,
    lazy: bool,
    entry_load: usize,
    /// Incremented by every seed; a snapshot restores only under the same value.
    generation: u64,
}

impl Default for PagedBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRY_LOAD)
    }
}

impl PagedBuffer {
    pub fn new(entry_load: usize) -> Self {
        Self {
            loaded: Vec::new(),
            start: Position::default(),
            end: Position::default(),
            first_loaded_id: None,
            last_loaded_id: None,
            lazy: true,
            entry_load: entry_load.max(1),
            generation: 0,
        }
    }

    /// Enables or disables lazy loading. Strict mode turns it off so the
    /// window never widens past the matched entries.
    pub fn set_lazy(&mut self, lazy: bool) {
        self.lazy = lazy;
    }

    pub fn lazy(&self) -> bool {
        self.lazy
    }

    /// Replaces the window contents with `entries`, which must be in
    /// strictly increasing id order.
    pub fn seed(&mut self, entries: Vec<RenderedEntry>) {
        self.generation = self.generation.wrapping_add(1);
        self.first_loaded_id = entries.first().map(|e| e.source_id);
        self.last_loaded_id = entries.last().map(|e| e.source_id);
        self.loaded = entries;
        let origin = if self.loaded.is_empty() {
            Position::default()
        } else {
            Position::new(0, self.first_unit(0))
        };
        self.start = origin;
        self.end = origin;
        debug!(
            "Seeded buffer with {} entries (ids {:?}..={:?})",
            self.loaded.len(),
            self.first_loaded_id,
            self.last_loaded_id
        );
    }

    /// Drops every loaded entry.
    pub fn clear(&mut self) {
        self.seed(Vec::new());
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    pub fn loaded(&self) -> &[RenderedEntry] {
        &self.loaded
    }

    pub fn first_loaded_id(&self) -> Option<usize> {
        self.first_loaded_id
    }

    pub fn last_loaded_id(&self) -> Option<usize> {
        self.last_loaded_id
    }

    pub fn position(&self) -> (Position, Position) {
        (self.start, self.end)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            start: self.start,
            end: self.end,
            first_id: self.first_loaded_id,
            generation: self.generation,
        }
    }

    /// Restores a window saved with [`snapshot`](Self::snapshot).
    ///
    /// Entries prepended since the snapshot are skipped over, so the same
    /// entries come back into view. Returns `false` and leaves the window
    /// alone if the buffer was re-seeded since or the positions do not
    /// address the current contents.
    pub fn restore(&mut self, snapshot: &Snapshot) -> bool {
        if snapshot.generation != self.generation {
            warn!("Rejecting window snapshot from an earlier seed");
            return false;
        }
        let shift = match (snapshot.first_id, self.first_loaded_id) {
            (Some(then), Some(now)) if now <= then => then - now,
            (None, None) => 0,
            (then, now) => {
                warn!(
                    "Rejecting window snapshot taken at id {:?}, window now starts at {:?}",
                    then, now
                );
                return false;
            }
        };
        let start = self.settle(Position::new(snapshot.start.entry + shift, snapshot.start.line));
        let end = self.settle(Position::new(snapshot.end.entry + shift, snapshot.end.line));
        if start > end || !self.is_valid(start) || !self.is_valid(end) {
            warn!("Rejecting window position {:?}..{:?}", start, end);
            return false;
        }
        self.start = start;
        self.end = end;
        true
    }

    /// Moves the window.
    ///
    /// With `increment == 0`, `count > 0` shows the `count` units after the
    /// window and `count < 0` the `-count` units before it. Otherwise the
    /// window first moves by `increment` units, then a page of `count`
    /// units is redisplayed on the side it moved towards.
    ///
    /// Returns `None` when nothing could be shown.
    pub fn scroll(
        &mut self,
        source: &dyn EntrySource,
        count: isize,
        increment: isize,
    ) -> Option<Vec<String>> {
        if increment == 0 {
            return self.scroll_by(source, count);
        }
        self.scroll_by(source, increment)?;
        let page = count.unsigned_abs() as isize;
        self.repeat(source, if increment > 0 { page } else { -page })
    }

    /// Redisplays `count` units ending at `end` (`count > 0`) or starting at
    /// `start` (`count < 0`), keeping that anchor.
    pub fn repeat(&mut self, source: &dyn EntrySource, count: isize) -> Option<Vec<String>> {
        let walk = if count > 0 {
            self.walk_backward(source, self.end, count.unsigned_abs())
        } else if count < 0 {
            self.walk_forward(source, self.start, count.unsigned_abs())
        } else {
            return None;
        };
        if walk.units == 0 {
            return None;
        }
        self.start = walk.first;
        self.end = walk.end;
        Some(walk.lines)
    }

    /// Moves by whole entries, then shows `lines` units from the first unit
    /// of the target entry.
    pub fn jump_entries(
        &mut self,
        source: &dyn EntrySource,
        delta: isize,
        lines: usize,
    ) -> Option<Vec<String>> {
        if self.loaded.is_empty() {
            return None;
        }
        let current = self.start.entry.min(self.loaded.len() - 1);
        let target = if delta >= 0 {
            let wanted = current + delta.unsigned_abs();
            while wanted >= self.loaded.len() && self.load_forward(source) > 0 {}
            wanted.min(self.loaded.len() - 1)
        } else {
            let back = delta.unsigned_abs();
            let mut current = current;
            while back > current {
                let added = self.load_backward(source);
                if added == 0 {
                    break;
                }
                current += added;
            }
            current.saturating_sub(back)
        };

        let origin = Position::new(target, self.first_unit(target));
        if delta != 0 && origin == self.start {
            return None;
        }
        self.start = origin;
        self.end = origin;
        Some(self.scroll_by(source, lines as isize).unwrap_or_default())
    }

    /// Lines of the units currently in the window, title blocks expanded.
    pub fn visible_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut pos = self.start;
        while pos < self.end && pos.entry < self.loaded.len() {
            lines.extend(self.unit_lines(pos));
            pos = self.step_forward(pos);
        }
        lines
    }

    fn scroll_by(&mut self, source: &dyn EntrySource, count: isize) -> Option<Vec<String>> {
        let walk = if count > 0 {
            self.walk_forward(source, self.end, count.unsigned_abs())
        } else if count < 0 {
            self.walk_backward(source, self.start, count.unsigned_abs())
        } else {
            return None;
        };
        if walk.units == 0 {
            return None;
        }
        self.start = walk.first;
        self.end = walk.end;
        Some(walk.lines)
    }

    fn walk_forward(&mut self, source: &dyn EntrySource, from: Position, count: usize) -> Walk {
        let mut lines = Vec::new();
        let mut units = 0;
        let mut pos = self.settle(from);
        let mut first = pos;

        while units < count {
            if pos.entry >= self.loaded.len() {
                if self.load_forward(source) == 0 {
                    break;
                }
                pos = self.settle(pos);
                if units == 0 {
                    first = pos;
                }
            }
            lines.extend(self.unit_lines(pos));
            units += 1;
            pos = self.step_forward(pos);
        }

        Walk {
            lines,
            first,
            end: pos,
            units,
        }
    }

    fn walk_backward(&mut self, source: &dyn EntrySource, from: Position, count: usize) -> Walk {
        let mut chunks: Vec<Vec<String>> = Vec::new();
        let mut end = from;
        let mut pos = from;

        while chunks.len() < count {
            let prev = match self.step_backward(pos) {
                Some(prev) => prev,
                None => {
                    let added = self.load_backward(source);
                    if added == 0 {
                        break;
                    }
                    end.entry += added;
                    pos.entry += added;
                    continue;
                }
            };
            chunks.push(self.unit_lines(prev));
            pos = prev;
        }

        let units = chunks.len();
        Walk {
            lines: chunks.into_iter().rev().flatten().collect(),
            first: pos,
            end,
            units,
        }
    }

    /// Appends the next block of ids after `last_loaded_id`.
    fn load_forward(&mut self, source: &dyn EntrySource) -> usize {
        if !self.lazy {
            return 0;
        }
        let Some(last) = self.last_loaded_id else {
            return 0;
        };
        let from = last + 1;
        let until = (from + self.entry_load).min(source.count());
        let mut added = 0;
        for id in from..until {
            match source.load(id) {
                Ok(rendered) => {
                    self.loaded.push(rendered);
                    self.last_loaded_id = Some(id);
                    added += 1;
                }
                Err(e) => {
                    warn!("Lazy load of entry {} failed, stopping here: {}", id, e);
                    break;
                }
            }
        }
        if added > 0 {
            debug!("Lazy-loaded {} entries after id {}", added, last);
        }
        added
    }

    /// Prepends the block of ids before `first_loaded_id` and shifts the
    /// window by the number of entries added.
    fn load_backward(&mut self, source: &dyn EntrySource) -> usize {
        if !self.lazy {
            return 0;
        }
        let Some(first) = self.first_loaded_id else {
            return 0;
        };
        let from = first.saturating_sub(self.entry_load);
        let mut block = Vec::new();
        for id in (from..first).rev() {
            match source.load(id) {
                Ok(rendered) => block.push(rendered),
                Err(e) => {
                    warn!("Lazy load of entry {} failed, stopping here: {}", id, e);
                    break;
                }
            }
        }
        let added = block.len();
        if added == 0 {
            return 0;
        }
        block.reverse();
        self.first_loaded_id = block.first().map(|e| e.source_id);
        self.loaded.splice(0..0, block);
        self.start.entry += added;
        self.end.entry += added;
        debug!("Lazy-loaded {} entries before id {}", added, first);
        added
    }

    fn first_unit(&self, entry: usize) -> usize {
        if self.loaded[entry].has_header() {
            0
        } else {
            1
        }
    }

    fn last_unit(&self, entry: usize) -> usize {
        self.loaded[entry].body_lines.len().max(self.first_unit(entry))
    }

    fn is_valid(&self, pos: Position) -> bool {
        if pos.entry == self.loaded.len() {
            return pos.line == 0;
        }
        pos.entry < self.loaded.len()
            && pos.line >= self.first_unit(pos.entry)
            && pos.line <= self.last_unit(pos.entry)
    }

    /// Moves an after-last position onto the first unit of an entry that
    /// has since been appended.
    fn settle(&self, pos: Position) -> Position {
        if pos.entry < self.loaded.len() && pos.line < self.first_unit(pos.entry) {
            Position::new(pos.entry, self.first_unit(pos.entry))
        } else {
            pos
        }
    }

    fn step_forward(&self, pos: Position) -> Position {
        if pos.line < self.last_unit(pos.entry) {
            Position::new(pos.entry, pos.line + 1)
        } else if pos.entry + 1 < self.loaded.len() {
            Position::new(pos.entry + 1, self.first_unit(pos.entry + 1))
        } else {
            Position::new(self.loaded.len(), 0)
        }
    }

    fn step_backward(&self, pos: Position) -> Option<Position> {
        if pos.entry < self.loaded.len() && pos.line > self.first_unit(pos.entry) {
            Some(Position::new(pos.entry, pos.line - 1))
        } else if pos.entry > 0 && !self.loaded.is_empty() {
            let prev = (pos.entry - 1).min(self.loaded.len() - 1);
            Some(Position::new(prev, self.last_unit(prev)))
        } else {
            None
        }
    }

    fn unit_lines(&self, pos: Position) -> Vec<String> {
        let entry = &self.loaded[pos.entry];
        if pos.line == 0 {
            entry.title_lines.clone()
        } else {
            entry.body_lines.get(pos.line - 1).cloned().into_iter().collect()
        }
    }
}
