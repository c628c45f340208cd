//! Loads the YAML project configuration into typed structs.
//!
//! This is the only place where untrusted YAML is parsed; every shorthand
//! the configuration schema permits (bare source strings, one-or-many
//! values, bare compiler payloads) deserialises here into the raw types of
//! `taskweave_core::config`. Unknown top-level keys are ignored so the same
//! file can carry configuration consumed elsewhere.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{error, info};

use taskweave_core::config::{BuildSection, DependencySection, DeploySection};
use taskweave_core::path::PathConfig;

/// The full project configuration: shared path roots plus one section per
/// task group.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub path: PathConfig,
    pub build: BuildSection,
    pub dependency: DependencySection,
    pub deploy: DeploySection,
}

/// Reads and parses a project configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ProjectConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "loading configuration from file");

    let content = fs::read_to_string(path_ref)
        .inspect_err(|e| error!(error = ?e, config_path = ?path_ref, "failed to read config file"))
        .with_context(|| format!("failed to read config file {path_ref:?}"))?;

    let config: ProjectConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| error!(error = ?e, config_path = ?path_ref, "failed to parse config YAML"))
        .with_context(|| format!("failed to parse config YAML {path_ref:?}"))?;

    info!(config_path = ?path_ref, "parsed config YAML successfully");
    Ok(config)
}
