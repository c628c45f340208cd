//! Plugin-list resolution: expanding symbolic markers into concrete stages.
//!
//! A configured plugin list may contain the `default` marker, a domain's
//! canonical marker (`normalise`, `bundle`, …) or already-concrete stage
//! descriptors. Resolution is a pure two-pass substitution over a tagged
//! variant type: `default` becomes the domain's canonical marker, the
//! canonical marker becomes the domain's concrete stage sequence, and every
//! other entry keeps its position. Stage order in the result is pipeline
//! execution order, exactly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Symbolic placeholder resolved to a concrete stage sequence per domain.
///
/// `Default` is the domain-independent spelling; each domain substitutes it
/// with its own canonical marker so callers never need to know the marker
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Default,
    Normalise,
    Bundle,
    Styles,
    Templates,
    Upload,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Marker::Default => "default",
            Marker::Normalise => "normalise",
            Marker::Bundle => "bundle",
            Marker::Styles => "styles",
            Marker::Templates => "templates",
            Marker::Upload => "upload",
        };
        f.write_str(name)
    }
}

/// One concrete transform in a file pipeline.
///
/// Stages are pure descriptors; the execution engine owns the transforms
/// themselves. `options`/`data` payloads are opaque to the orchestration
/// layer and handed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Stage {
    /// Minify the file stream.
    Minify,
    /// Concatenate the stream into a single named output file.
    Concat { filename: String },
    /// Bundle scripts with the configured bundler options.
    Bundle { options: serde_json::Value },
    /// Compile stylesheet sources.
    CompileStyles { options: serde_json::Value },
    /// Compile markup templates.
    CompileTemplates { data: serde_json::Value },
    /// Upload the stream to a remote target.
    Upload { options: serde_json::Value },
    /// Apply `stage` only to inputs whose filename matches `pattern`.
    When { pattern: String, stage: Box<Stage> },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Minify => f.write_str("minify"),
            Stage::Concat { filename } => write!(f, "concat({filename})"),
            Stage::Bundle { .. } => f.write_str("bundle"),
            Stage::CompileStyles { .. } => f.write_str("compile-styles"),
            Stage::CompileTemplates { .. } => f.write_str("compile-templates"),
            Stage::Upload { .. } => f.write_str("upload"),
            Stage::When { pattern, stage } => write!(f, "when({pattern}, {stage})"),
        }
    }
}

/// A plugin entry as authored in configuration.
///
/// Bare strings deserialise to markers, objects to concrete stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Plugin {
    Named(Marker),
    Concrete(Stage),
}

/// A domain's canonical marker and the stage sequence it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainStages {
    pub marker: Marker,
    pub stages: Vec<Stage>,
}

/// Resolves a configured plugin list into an ordered stage list.
///
/// An empty list means "use the default pipeline". The substitution happens
/// at a single point: entries before and after the marker bracket the
/// substituted stages unmoved. A second occurrence of the canonical marker
/// is a no-op once the first has been substituted, so `[default, marker]`
/// resolves exactly like `[marker]`.
pub fn resolve(plugins: &[Plugin], defaults: &DomainStages) -> Result<Vec<Stage>, ConfigError> {
    let plugins: Vec<Plugin> = if plugins.is_empty() {
        vec![Plugin::Named(Marker::Default)]
    } else {
        plugins.to_vec()
    };

    // Pass 1: the default marker becomes the domain's canonical marker.
    let plugins = plugins.into_iter().map(|plugin| match plugin {
        Plugin::Named(Marker::Default) => Plugin::Named(defaults.marker),
        other => other,
    });

    // Pass 2: the canonical marker becomes the concrete stage sequence.
    let mut stages = Vec::new();
    let mut substituted = false;
    for plugin in plugins {
        match plugin {
            Plugin::Named(marker) if marker == defaults.marker => {
                if !substituted {
                    stages.extend(defaults.stages.iter().cloned());
                    substituted = true;
                }
            }
            Plugin::Named(marker) => return Err(ConfigError::UnknownMarker(marker)),
            Plugin::Concrete(stage) => stages.push(stage),
        }
    }
    Ok(stages)
}
