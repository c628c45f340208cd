//! # contract: collaborator interfaces for task execution
//!
//! This module defines the traits through which the orchestration layer
//! talks to its external collaborators: the task execution engine, the
//! deletion collaborator and the schema validation mechanism.
//!
//! ## Interface & Extensibility
//! - Implement [`Engine`] to supply a real task runner; registration is
//!   synchronous and produces no side effects beyond storing the task.
//! - Implement [`Cleaner`] for the deletion primitive used by clean tasks.
//! - Implement [`SchemaValidator`] to reject malformed domain configuration
//!   before normalisation.
//!
//! ## Mocking & Testing
//! - All traits are annotated for `mockall` so consumers can generate
//!   deterministic mocks in unit and integration tests; the mocks are
//!   exported behind the `test-export-mocks` feature.

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::{EngineError, ValidationError};
use crate::task::RegisteredTask;

/// Error type for the deletion collaborator (simple boxed error for now).
pub type CleanError = Box<dyn std::error::Error + Send + Sync>;

/// The external task execution engine.
///
/// Registration is single-threaded and synchronous; registering the same
/// name twice overwrites the earlier task. Execution is the engine's own
/// concern and may run independent tasks concurrently, but must honour
/// sequence ordering: a build task never observes a directory mid-clean.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Engine: Send + Sync {
    /// Register a named task. Last registration for a name wins.
    fn register_task(&self, task: RegisteredTask);

    /// Execute a previously registered task by name.
    async fn run_task(&self, name: &str) -> Result<(), EngineError>;
}

/// The deletion collaborator used by clean tasks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Cleaner: Send + Sync {
    /// Delete a path or glob target. `force` permits deleting outside the
    /// working directory, mirroring the underlying primitive.
    async fn delete(&self, target: &str, force: bool) -> Result<(), CleanError>;
}

/// The schema validation collaborator.
///
/// Factories validate their raw domain configuration against a named schema
/// before normalising; rejection is fatal at graph-construction time.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, value: &serde_json::Value, schema_id: &str) -> Result<(), ValidationError>;
}
