//! Error taxonomy for graph construction and task invocation.
//!
//! Configuration problems are always fatal at construction time: a factory
//! either registers all of its tasks or none of them. Failures inside the
//! execution engine are passed through unchanged on its own channel.

use thiserror::Error;

use crate::plugin::Marker;

/// Structurally invalid or unresolvable domain configuration.
///
/// Raised while the task graph is being constructed, before any task runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A relative path needs a root that the path configuration does not declare.
    #[error("path configuration has no \"{root}\" root, required to resolve \"{path}\"")]
    MissingRoot { root: String, path: String },

    /// A plugin marker for which the domain defines no default stage sequence.
    #[error("no default stages are defined for plugin marker \"{0}\"")]
    UnknownMarker(Marker),

    /// A dependency target without a source, e.g. an empty record.
    #[error("dependency \"{key}\" does not declare a source")]
    MissingSource { key: String },

    /// Clean is enabled but neither an explicit target nor a default could be derived.
    #[error("clean is enabled but no target is configured and none could be derived")]
    MissingCleanTarget,

    /// The schema validation collaborator rejected the configuration.
    #[error("configuration was rejected by schema \"{schema}\"")]
    Schema {
        schema: String,
        #[source]
        source: ValidationError,
    },

    /// The raw configuration could not be serialised for schema validation.
    #[error("configuration could not be serialised for validation")]
    Serialise(#[from] serde_json::Error),
}

/// Failure reported by the schema validation collaborator.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Identifier of the schema the value was validated against.
    pub schema: String,
    /// Human-readable rejection reason.
    pub message: String,
}

/// Failure raised when running a registered task.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The umbrella task was invoked but no domain produced any tasks.
    #[error("no tasks were configured, make sure your configuration is correct")]
    NoTasksConfigured,

    /// A sequence referenced a task name that was never registered.
    #[error("unknown task \"{0}\"")]
    UnknownTask(String),

    /// A task body failed; passed through unchanged from the engine's collaborators.
    #[error("task \"{task}\" failed")]
    Execution {
        task: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
