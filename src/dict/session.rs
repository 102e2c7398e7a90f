//! # Session
//!
//! Owns the opened dictionaries, the paged window and the search modes.
//! A query is resolved against the selected dictionary and the window is
//! seeded from the result:
//!
//! ```text
//! strict      ids: every match              lazy load off
//! non-strict  ids: first run of consecutive  lazy load on
//!                  matches, else the nearest hit
//! ```
//!
//! Changing a mode or the selected dictionary re-runs the last query.

use log::{debug, info, warn};

use crate::dict::config::{PagerConfig, SearchModes};
use crate::dict::loader::{self, ArchiveSpec};
use crate::dict::pager::{find_spans, PagedBuffer, Snapshot, Span, VisibleSearch};
use crate::dict::search::{resolve, Resolution};
use crate::dict::types::error::{DictError, Result};
use crate::dict::types::models::{MatchKind, RenderedEntry};
use crate::dict::Dictionary;

#[derive(Debug)]
pub struct Session {
    dictionaries: Vec<Dictionary>,
    failed: Vec<(String, DictError)>,
    selected: usize,
    buffer: PagedBuffer,
    config: PagerConfig,
    last_query: Option<String>,
}

impl Session {
    /// Opens every archive in `specs` and starts a session over those that
    /// opened.
    ///
    /// # Errors
    /// - `Config` if `config` does not validate or `specs` is empty
    /// - the first archive's error when none of them opened
    pub fn open(specs: &[ArchiveSpec], config: PagerConfig) -> Result<Self> {
        config.validate()?;
        let (dictionaries, failed) = loader::open_all(specs);
        if dictionaries.is_empty() {
            return Err(failed
                .into_iter()
                .next()
                .map(|(_, e)| e)
                .unwrap_or_else(|| DictError::Config("no dictionaries given".to_string())));
        }
        let mut session = Self::from_dictionaries(dictionaries, config)?;
        session.failed = failed;
        Ok(session)
    }

    /// Starts a session over already opened dictionaries.
    pub fn from_dictionaries(dictionaries: Vec<Dictionary>, config: PagerConfig) -> Result<Self> {
        config.validate()?;
        if dictionaries.is_empty() {
            return Err(DictError::Config("no dictionaries given".to_string()));
        }
        info!(
            "Session started with {} dictionaries: {}",
            dictionaries.len(),
            dictionaries
                .iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self {
            dictionaries,
            failed: Vec::new(),
            selected: 0,
            buffer: PagedBuffer::new(config.entry_load),
            config,
            last_query: None,
        })
    }

    /// Resolves `term` and returns the first page, or `None` for no match.
    pub fn search(&mut self, term: &str) -> Option<Vec<String>> {
        self.last_query = Some(term.to_string());
        self.refresh()
    }

    /// See [`PagedBuffer::scroll`].
    pub fn scroll(&mut self, count: isize, increment: isize) -> Option<Vec<String>> {
        let view = self.dictionaries[self.selected].view(&self.config.layout, self.config.modes.regex);
        self.buffer.scroll(&view, count, increment)
    }

    /// See [`PagedBuffer::repeat`].
    pub fn repeat(&mut self, count: isize) -> Option<Vec<String>> {
        let view = self.dictionaries[self.selected].view(&self.config.layout, self.config.modes.regex);
        self.buffer.repeat(&view, count)
    }

    /// See [`PagedBuffer::jump_entries`].
    pub fn jump_entries(&mut self, delta: isize, lines: usize) -> Option<Vec<String>> {
        let view = self.dictionaries[self.selected].view(&self.config.layout, self.config.modes.regex);
        self.buffer.jump_entries(&view, delta, lines)
    }

    /// Highlight spans for `term` over the lines currently displayed.
    pub fn search_visible(&self, term: &str, as_regex: bool) -> Vec<Span> {
        self.search_visible_with(term, VisibleSearch { as_regex, raw: false })
    }

    pub fn search_visible_with(&self, term: &str, options: VisibleSearch) -> Vec<Span> {
        find_spans(&self.buffer.visible_lines(), term, options)
    }

    pub fn visible_lines(&self) -> Vec<String> {
        self.buffer.visible_lines()
    }

    /// Saves the window so a provisional move can be undone.
    pub fn position(&self) -> Snapshot {
        self.buffer.snapshot()
    }

    /// Restores a window from [`position`](Self::position), remapped over
    /// any entries lazy-loaded before it since. Returns `false` if a new
    /// query or mode change has re-seeded the window in between.
    pub fn set_position(&mut self, snapshot: &Snapshot) -> bool {
        self.buffer.restore(snapshot)
    }

    pub fn set_strict(&mut self, strict: bool) -> Option<Vec<String>> {
        self.config.modes.strict = strict;
        self.refresh()
    }

    pub fn set_regex(&mut self, regex: bool) -> Option<Vec<String>> {
        self.config.modes.regex = regex;
        self.refresh()
    }

    pub fn set_normalize(&mut self, normalize: bool) -> Option<Vec<String>> {
        self.config.modes.normalize = normalize;
        self.refresh()
    }

    /// Makes dictionary `index` the one searched and re-runs the last query.
    ///
    /// An out-of-range index leaves the selection alone and returns `None`.
    pub fn select_dictionary(&mut self, index: usize) -> Option<Vec<String>> {
        if index >= self.dictionaries.len() {
            warn!(
                "No dictionary at index {} ({} open)",
                index,
                self.dictionaries.len()
            );
            return None;
        }
        self.selected = index;
        debug!("Selected dictionary '{}'", self.dictionaries[index].name);
        self.refresh()
    }

    /// Cycles forward through the open dictionaries.
    pub fn next_dictionary(&mut self) -> Option<Vec<String>> {
        self.select_dictionary((self.selected + 1) % self.dictionaries.len())
    }

    /// Cycles backward through the open dictionaries.
    pub fn previous_dictionary(&mut self) -> Option<Vec<String>> {
        let count = self.dictionaries.len();
        self.select_dictionary((self.selected + count - 1) % count)
    }

    /// Empties the window and forgets the last query. Catalogs stay loaded.
    pub fn reset(&mut self) {
        self.last_query = None;
        self.buffer.clear();
    }

    pub fn dictionaries(&self) -> &[Dictionary] {
        &self.dictionaries
    }

    /// Archives that failed to open, with their errors.
    pub fn failed(&self) -> &[(String, DictError)] {
        &self.failed
    }

    pub fn selected(&self) -> &Dictionary {
        &self.dictionaries[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn modes(&self) -> SearchModes {
        self.config.modes
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn buffer(&self) -> &PagedBuffer {
        &self.buffer
    }

    /// Re-seeds from the last query and returns the first page.
    fn refresh(&mut self) -> Option<Vec<String>> {
        if !self.reseed() {
            return None;
        }
        self.scroll(self.config.page_lines as isize, 0)
    }

    /// Resolves the last query and replaces the window contents. Returns
    /// `false` when nothing could be seeded.
    fn reseed(&mut self) -> bool {
        let Some(query) = self.last_query.as_deref() else {
            self.buffer.clear();
            return false;
        };
        let dict = &self.dictionaries[self.selected];
        let modes = self.config.modes;
        let resolution = resolve(&dict.catalog, query, &self.config.search_options());

        let plan = seed_plan(&resolution, modes);
        if let Some((_, kind)) = plan.first() {
            debug!(
                "Seeding {} {} entries for {:?} in '{}'",
                plan.len(),
                kind,
                query,
                dict.name
            );
        }

        let mut rendered: Vec<RenderedEntry> = Vec::new();
        for (id, kind) in plan {
            match dict.render_entry(id, &self.config.layout, kind) {
                Ok(entry) => rendered.push(entry),
                Err(e) => {
                    warn!("Could not render entry {} of '{}': {}", id, dict.name, e);
                    break;
                }
            }
        }

        if rendered.is_empty() {
            debug!("No match for {:?} in '{}'", query, dict.name);
        }
        self.buffer.set_lazy(!modes.strict);
        self.buffer.seed(rendered);
        !self.buffer.is_empty()
    }
}

/// Picks the ids to seed the window with and how each one matched.
fn seed_plan(resolution: &Resolution<'_>, modes: SearchModes) -> Vec<(usize, MatchKind)> {
    let matched = MatchKind::Strict { regex: modes.regex };
    if modes.strict {
        return resolution.matches.iter().map(|e| (e.id, matched)).collect();
    }
    if let Some(first) = resolution.matches.first() {
        let mut plan = vec![(first.id, matched)];
        for entry in &resolution.matches[1..] {
            if entry.id != plan[plan.len() - 1].0 + 1 {
                break;
            }
            plan.push((entry.id, matched));
        }
        return plan;
    }
    resolution
        .nearest
        .map(|e| vec![(e.id, MatchKind::BestEffort { regex: modes.regex })])
        .unwrap_or_default()
}
