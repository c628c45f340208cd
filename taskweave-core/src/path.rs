//! Path resolution against the shared root-path configuration.
//!
//! Every domain resolves its relative source and destination values against
//! a symbolic root ("source", "destination", "dependency", "library", …)
//! declared in [`PathConfig`]. Sources structurally require their root and
//! fail fast without one; destinations pass through unchanged so callers can
//! supply final paths directly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Mapping from symbolic root name to a base filesystem path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathConfig(BTreeMap<String, PathBuf>);

impl PathConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, root: impl Into<String>, path: impl Into<PathBuf>) {
        self.0.insert(root.into(), path.into());
    }

    pub fn get(&self, root: &str) -> Option<&Path> {
        self.0.get(root).map(PathBuf::as_path)
    }

    pub fn contains(&self, root: &str) -> bool {
        self.0.contains_key(root)
    }
}

/// Resolves a domain source path against its designated root.
///
/// Absolute values pass through unchanged. Relative values join against the
/// root looked up by `root`; a relative value with no matching root is a
/// configuration error, never a silent default.
pub fn resolve_source(paths: &PathConfig, root: &str, raw: &str) -> Result<String, ConfigError> {
    if Path::new(raw).is_absolute() {
        return Ok(raw.to_string());
    }
    match paths.get(root) {
        Some(base) => Ok(join(base, raw)),
        None => Err(ConfigError::MissingRoot {
            root: root.to_string(),
            path: raw.to_string(),
        }),
    }
}

/// Resolves a destination path against a root when one is configured.
///
/// Absolute values and values with no matching root are treated as
/// caller-provided final paths and returned unchanged.
pub fn resolve_destination(paths: &PathConfig, root: &str, raw: &str) -> String {
    if Path::new(raw).is_absolute() {
        return raw.to_string();
    }
    match paths.get(root) {
        Some(base) => join(base, raw),
        None => raw.to_string(),
    }
}

/// Appends a glob suffix to a path unless the path is already a glob.
pub fn globalise(path: &str, suffix: &str) -> String {
    if path.contains('*') {
        path.to_string()
    } else {
        join(Path::new(path), suffix)
    }
}

/// Extracts the single file extension from a glob of the form `…**/*.ext`.
///
/// Returns `None` when no single extension can be derived, e.g. for `**/*.*`
/// or a value without a wildcard. Multi-dot patterns yield the final
/// extension, so `**/*.min.js` derives `js`.
pub fn glob_extension(glob: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"\*[^/]*\.([A-Za-z0-9]+)$").expect("glob extension pattern"));
    pattern
        .captures(glob)
        .map(|captures| captures[1].to_string())
}

fn join(base: &Path, raw: &str) -> String {
    base.join(raw).to_string_lossy().into_owned()
}
