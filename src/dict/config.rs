//! Session configuration.
//!
//! Options can be built in code or read from `key = value` text:
//!
//! ```text
//! # layout
//! width = 100
//! show_header = false
//! entry_load = 40
//! strict = true
//! ```
//!
//! Unknown option names and unusable values are rejected up front.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::dict::pager::DEFAULT_ENTRY_LOAD;
use crate::dict::render::Layout;
use crate::dict::search::SearchOptions;
use crate::dict::types::error::{DictError, Result};

/// Search mode flags. Toggling any of them re-seeds the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchModes {
    /// Exact or pattern matches only, no lazy widening.
    pub strict: bool,
    pub regex: bool,
    /// Strip diacritics and fold case before comparing.
    pub normalize: bool,
}

impl Default for SearchModes {
    fn default() -> Self {
        Self {
            strict: false,
            regex: false,
            normalize: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerConfig {
    pub layout: Layout,
    pub entry_load: usize,
    pub page_lines: usize,
    pub max_matches: Option<usize>,
    pub modes: SearchModes,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            entry_load: DEFAULT_ENTRY_LOAD,
            page_lines: 24,
            max_matches: None,
            modes: SearchModes::default(),
        }
    }
}

impl PagerConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    /// Applies one option by name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "width" => self.layout.width = parse_number(key, value)?,
            "left_margin" => self.layout.left_margin = parse_number(key, value)?,
            "right_margin" => self.layout.right_margin = parse_number(key, value)?,
            "show_header" => self.layout.show_header = parse_bool(key, value)?,
            "entry_load" => self.entry_load = parse_number(key, value)?,
            "page_lines" => self.page_lines = parse_number(key, value)?,
            "max_matches" => {
                self.max_matches = match value {
                    "" | "none" => None,
                    _ => Some(parse_number(key, value)?),
                }
            }
            "strict" => self.modes.strict = parse_bool(key, value)?,
            "regex" => self.modes.regex = parse_bool(key, value)?,
            "normalize" => self.modes.normalize = parse_bool(key, value)?,
            _ => return Err(DictError::Config(format!("unknown option '{}'", key))),
        }
        Ok(())
    }

    /// Checks that the options describe a usable layout.
    pub fn validate(&self) -> Result<()> {
        let Layout {
            width,
            left_margin,
            right_margin,
            ..
        } = self.layout;
        if left_margin + right_margin >= width {
            return Err(DictError::Config(format!(
                "width {} leaves no room for margins {}+{}",
                width, left_margin, right_margin
            )));
        }
        if self.entry_load == 0 {
            return Err(DictError::Config("entry_load must be at least 1".to_string()));
        }
        if self.page_lines == 0 {
            return Err(DictError::Config("page_lines must be at least 1".to_string()));
        }
        if self.max_matches == Some(0) {
            return Err(DictError::Config("max_matches must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Resolver options for the current modes.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            normalize_diacritics: self.modes.normalize,
            fold_case: self.modes.normalize,
            as_regex: self.modes.regex,
            max_matches: self.max_matches,
        }
    }
}

impl FromStr for PagerConfig {
    type Err = DictError;

    fn from_str(text: &str) -> Result<Self> {
        let mut config = PagerConfig::default();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                DictError::Config(format!("line {}: expected key = value", n + 1))
            })?;
            config.set(key.trim(), value.trim())?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| DictError::Config(format!("'{}' expects a number, got '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DictError::Config(format!(
            "'{}' expects a boolean, got '{}'",
            key, value
        ))),
    }
}
