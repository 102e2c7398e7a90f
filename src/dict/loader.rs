//! Opens several archives at once.
//!
//! Each archive is opened on its own scoped thread; the results are joined
//! back in input order. One broken archive never prevents the others from
//! opening.

use std::path::PathBuf;
use std::thread;

use log::{info, warn};

use crate::dict::types::error::DictError;
use crate::dict::Dictionary;

/// A dictionary to open: display name and base path of its three files.
pub type ArchiveSpec = (String, PathBuf);

/// Opens every archive in `specs`.
///
/// Returns the dictionaries that opened, in input order, and the name and
/// error of each one that did not.
pub fn open_all(specs: &[ArchiveSpec]) -> (Vec<Dictionary>, Vec<(String, DictError)>) {
    let results: Vec<(String, Result<Dictionary, DictError>)> = thread::scope(|scope| {
        let handles: Vec<_> = specs
            .iter()
            .map(|(name, base)| {
                let handle = scope.spawn(move || Dictionary::open(name.clone(), base));
                (name, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(name, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(DictError::Io(std::io::Error::other(format!(
                        "loader thread for '{}' panicked",
                        name
                    ))))
                });
                (name.clone(), result)
            })
            .collect()
    });

    let mut opened = Vec::new();
    let mut failed = Vec::new();
    for (name, result) in results {
        match result {
            Ok(dict) => opened.push(dict),
            Err(e) => {
                warn!("Failed to open dictionary '{}': {}", name, e);
                failed.push((name, e));
            }
        }
    }
    info!(
        "Opened {} of {} dictionaries",
        opened.len(),
        specs.len()
    );
    (opened, failed)
}

/// Parses a command-line archive argument, `name=base` or a bare `base`
/// named after its file stem.
pub fn parse_spec(arg: &str) -> ArchiveSpec {
    match arg.split_once('=') {
        Some((name, base)) if !name.is_empty() && !base.is_empty() => {
            (name.to_string(), PathBuf::from(base))
        }
        _ => {
            let base = PathBuf::from(arg);
            let name = base
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| arg.to_string());
            (name, base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_bare_specs() {
        assert_eq!(
            parse_spec("en=dicts/english"),
            ("en".to_string(), PathBuf::from("dicts/english"))
        );
        assert_eq!(
            parse_spec("dicts/english"),
            ("english".to_string(), PathBuf::from("dicts/english"))
        );
    }

    #[test]
    fn missing_archives_are_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let specs = vec![
            ("a".to_string(), dir.path().join("nope")),
            ("b".to_string(), dir.path().join("gone")),
        ];
        let (opened, failed) = open_all(&specs);
        assert!(opened.is_empty());
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0].0, "a");
        assert!(matches!(failed[1].1, DictError::MissingFile { .. }));
    }
}
