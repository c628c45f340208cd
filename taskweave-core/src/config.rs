//! Configuration shapes and the build-domain normalisation rules.
//!
//! Raw types mirror what users author: shorthand strings, one-or-many
//! values, optional fields, bare compiler payloads. Normalisation is a pure,
//! deterministic, idempotent function from the raw shape to a fully
//! populated record; downstream code never re-checks for absence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::plugin::Plugin;

/// CLI-provided parameters every factory receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Parameters {
    /// Minify and strip everything that can be.
    pub production: bool,
    /// Fallback for domains that leave `watch` unset.
    pub watch: bool,
}

/// One-or-many shorthand used by `source` and `destination` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

/// `clean` accepts a boolean or, where the domain permits it, an explicit
/// target path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CleanSetting {
    Flag(bool),
    Target(String),
}

/// Raw configuration for the script/stylesheet/template build domains.
///
/// A record containing none of the known keys is the compiler configuration
/// payload itself; the flattened remainder captures it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBuildTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<Plugin>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Fully populated build-domain configuration. No optional field survives
/// normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildTarget {
    pub source: Vec<String>,
    pub destination: Vec<String>,
    pub plugins: Vec<Plugin>,
    pub clean: bool,
    pub watch: bool,
    pub configuration: serde_json::Value,
}

/// Domain defaults consulted when a raw field is absent.
#[derive(Debug, Clone, Copy)]
pub struct BuildDefaults {
    /// Default source subdirectory under the `source` root.
    pub source: &'static str,
    /// Default destination subdirectory under the `destination` root.
    pub destination: &'static str,
}

/// Normalises a raw build-domain record.
///
/// Rules, first applicable wins:
/// - a record with none of the known keys is the compiler payload itself;
/// - explicit `clean: false` disables cleaning, anything else enables it;
/// - explicit `watch` wins, else the CLI watch flag;
/// - absent `source`/`destination` fall back to the domain defaults.
pub fn normalise_build_target(
    raw: RawBuildTarget,
    defaults: &BuildDefaults,
    parameters: Parameters,
) -> BuildTarget {
    let shorthand = raw.source.is_none()
        && raw.destination.is_none()
        && raw.clean.is_none()
        && raw.watch.is_none()
        && raw.configuration.is_none()
        && !raw.rest.is_empty();

    let configuration = if shorthand {
        serde_json::Value::Object(raw.rest)
    } else {
        raw.configuration.unwrap_or(serde_json::Value::Null)
    };

    BuildTarget {
        source: raw
            .source
            .map(OneOrMany::into_vec)
            .unwrap_or_else(|| vec![defaults.source.to_string()]),
        destination: raw
            .destination
            .map(OneOrMany::into_vec)
            .unwrap_or_else(|| vec![defaults.destination.to_string()]),
        plugins: raw.plugins.unwrap_or_default(),
        clean: raw.clean != Some(false),
        watch: raw.watch.unwrap_or(parameters.watch),
        configuration,
    }
}

impl From<BuildTarget> for RawBuildTarget {
    fn from(target: BuildTarget) -> Self {
        RawBuildTarget {
            source: Some(OneOrMany::Many(target.source)),
            destination: Some(OneOrMany::Many(target.destination)),
            plugins: Some(target.plugins),
            clean: Some(target.clean),
            watch: Some(target.watch),
            configuration: Some(target.configuration),
            rest: serde_json::Map::new(),
        }
    }
}

/// Raw dependency-vendoring target: a bare source string or a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawVendorTarget {
    Source(String),
    Record(RawVendorRecord),
}

/// Record form of a vendoring target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVendorRecord {
    #[serde(default)]
    pub source: Option<OneOrMany>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub plugins: Option<Vec<Plugin>>,
}

/// Raw deployment target. The flattened remainder is the transport
/// configuration, so credentials/region style payloads need no wrapper key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSyncTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<Plugin>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Top-level `build` group configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub bundle: Option<RawBuildTarget>,
    pub styles: Option<RawBuildTarget>,
    pub templates: Option<RawBuildTarget>,
}

/// Top-level `dependency` group configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencySection {
    pub normalise: Option<BTreeMap<String, RawVendorTarget>>,
    pub clean: Option<CleanSetting>,
}

/// Top-level `deploy` group configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploySection {
    pub sync: Option<RawSyncTarget>,
}
