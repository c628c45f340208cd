//! Declarative task model registered with the execution engine.
//!
//! A registered task carries a name, optional help text and a pure
//! [`TaskAction`] body; nothing here executes. The engine interprets the
//! action when the task is invoked.

use serde::{Deserialize, Serialize};

use crate::plugin::Stage;

/// Task names registered with the engine, one set per task group.
pub mod name {
    pub const BUILD: &str = "build";
    pub const BUILD_BUNDLE: &str = "build-bundle";
    pub const BUILD_BUNDLE_CLEAN: &str = "build-bundle-clean";
    pub const BUILD_BUNDLE_WATCH: &str = "build-bundle-watch";
    pub const BUILD_STYLES: &str = "build-styles";
    pub const BUILD_STYLES_CLEAN: &str = "build-styles-clean";
    pub const BUILD_STYLES_WATCH: &str = "build-styles-watch";
    pub const BUILD_TEMPLATES: &str = "build-templates";
    pub const BUILD_TEMPLATES_CLEAN: &str = "build-templates-clean";
    pub const BUILD_TEMPLATES_WATCH: &str = "build-templates-watch";
    pub const DEPENDENCY: &str = "dependency";
    pub const DEPENDENCY_NORMALISE: &str = "dependency-normalise";
    pub const DEPENDENCY_CLEAN: &str = "dependency-clean";
    pub const DEPLOY: &str = "deploy";
    pub const DEPLOY_SYNC: &str = "deploy-sync";
}

/// One source-to-destination file stream with its ordered transform stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Glob patterns the engine reads input files from.
    pub sources: Vec<String>,
    /// Transform stages, applied in order.
    pub stages: Vec<Stage>,
    /// Paths the transformed files are written to.
    pub destinations: Vec<String>,
}

/// The body of a registered task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskAction {
    /// Run one or more file pipelines; multiple specs are merged streams.
    Pipeline(Vec<PipelineSpec>),
    /// Delete the target paths or globs.
    Clean { targets: Vec<String> },
    /// Watch the globs and re-run `rerun` on changes, for the process lifetime.
    Watch { globs: Vec<String>, rerun: Vec<String> },
    /// Run steps in order; names within a parallel step run concurrently.
    Sequence(Vec<SequenceStep>),
}

/// One step in an umbrella sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SequenceStep {
    Single(String),
    Parallel(Vec<String>),
}

/// One `flag: explanation` pair surfaced in umbrella task help.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpOption {
    pub flag: String,
    pub text: String,
}

impl HelpOption {
    pub fn new(flag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            text: text.into(),
        }
    }
}

/// A named task handed to the engine. Registering a name twice overwrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredTask {
    pub name: String,
    /// Help description; `None` hides the task from help listings.
    pub description: Option<String>,
    pub action: TaskAction,
    /// Help options attached to the task, umbrella tasks only.
    pub options: Vec<HelpOption>,
}

/// The ordered build/clean/watch task-name lists a factory returns.
///
/// `options` is the explicit help-text accumulator: write-only from a
/// factory's perspective, merged by the composite factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSet {
    pub build: Vec<String>,
    pub clean: Vec<String>,
    pub watch: Vec<String>,
    pub options: Vec<HelpOption>,
}

impl TaskSet {
    /// Appends another set's lists onto this one, preserving order.
    pub fn merge(&mut self, other: TaskSet) {
        self.build.extend(other.build);
        self.clean.extend(other.clean);
        self.watch.extend(other.watch);
        self.options.extend(other.options);
    }

    /// Whether no task of any kind was produced.
    pub fn is_empty(&self) -> bool {
        self.build.is_empty() && self.clean.is_empty() && self.watch.is_empty()
    }
}
