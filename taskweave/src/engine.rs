//! Collaborator adapters wired up by the CLI.
//!
//! [`PlanEngine`] implements the engine contract far enough to drive a CLI
//! invocation: it keeps the task registry, runs umbrella sequences in order
//! (parallel clean group first), executes clean actions through a
//! [`Cleaner`] and renders pipeline/watch actions as the resolved plan.
//! Running the transforms themselves belongs to the full execution engine,
//! which this crate deliberately does not ship.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::future::{try_join_all, BoxFuture};
use tracing::{debug, info};

use taskweave_core::contract::{CleanError, Cleaner, Engine, SchemaValidator};
use taskweave_core::error::{EngineError, ValidationError};
use taskweave_core::task::{RegisteredTask, SequenceStep, TaskAction};

/// Engine adapter holding the task registry and a deletion collaborator.
pub struct PlanEngine<C> {
    tasks: Mutex<HashMap<String, RegisteredTask>>,
    cleaner: C,
}

impl<C: Cleaner> PlanEngine<C> {
    pub fn new(cleaner: C) -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            cleaner,
        }
    }

    fn task(&self, name: &str) -> Result<RegisteredTask, EngineError> {
        self.tasks
            .lock()
            .expect("task registry lock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownTask(name.to_string()))
    }

    /// Renders a registered task's help surface: its description followed
    /// by one line per help option.
    pub fn task_help(&self, name: &str) -> Result<String, EngineError> {
        let task = self.task(name)?;
        let mut lines: Vec<String> = task.description.into_iter().collect();
        lines.extend(
            task.options
                .iter()
                .map(|option| format!("  --{:<12} {}", option.flag, option.text)),
        );
        Ok(lines.join("\n"))
    }

    fn run_named<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), EngineError>> {
        Box::pin(async move {
            let task = self.task(name)?;
            match task.action {
                TaskAction::Sequence(steps) => {
                    if steps.is_empty() {
                        return Err(EngineError::NoTasksConfigured);
                    }
                    for step in steps {
                        match step {
                            SequenceStep::Single(next) => self.run_named(&next).await?,
                            SequenceStep::Parallel(names) => {
                                try_join_all(names.iter().map(|next| self.run_named(next)))
                                    .await
                                    .map(drop)?;
                            }
                        }
                    }
                    Ok(())
                }
                TaskAction::Clean { targets } => {
                    for target in &targets {
                        info!(task = name, target, "deleting clean target");
                        self.cleaner.delete(target, true).await.map_err(|source| {
                            EngineError::Execution {
                                task: name.to_string(),
                                source,
                            }
                        })?;
                    }
                    Ok(())
                }
                TaskAction::Pipeline(specs) => {
                    for spec in &specs {
                        let stages: Vec<String> =
                            spec.stages.iter().map(ToString::to_string).collect();
                        println!(
                            "{name}: {} -> [{}] -> {}",
                            spec.sources.join(", "),
                            stages.join(" | "),
                            spec.destinations.join(", ")
                        );
                    }
                    Ok(())
                }
                TaskAction::Watch { globs, rerun } => {
                    println!(
                        "{name}: watching {} -> re-runs {}",
                        globs.join(", "),
                        rerun.join(", ")
                    );
                    Ok(())
                }
            }
        })
    }
}

#[async_trait]
impl<C: Cleaner> Engine for PlanEngine<C> {
    fn register_task(&self, task: RegisteredTask) {
        let mut tasks = self.tasks.lock().expect("task registry lock poisoned");
        if tasks.insert(task.name.clone(), task).is_some() {
            debug!("task re-registered, previous definition overwritten");
        }
    }

    async fn run_task(&self, name: &str) -> Result<(), EngineError> {
        info!(task = name, "running task");
        self.run_named(name).await
    }
}

/// Filesystem deletion collaborator.
///
/// Accepts plain paths, `dir/*` style targets and `dir/**/*.ext` globs;
/// with `force`, a missing target is not an error.
pub struct FsCleaner;

#[async_trait]
impl Cleaner for FsCleaner {
    async fn delete(&self, target: &str, force: bool) -> Result<(), CleanError> {
        let target = target.to_string();
        let outcome = tokio::task::spawn_blocking(move || delete_target(&target, force)).await;
        match outcome {
            Ok(result) => result.map_err(Into::into),
            Err(join_error) => Err(Box::new(join_error)),
        }
    }
}

fn delete_target(target: &str, force: bool) -> std::io::Result<()> {
    let missing = |path: &Path| {
        if force {
            Ok(())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("clean target {path:?} does not exist"),
            ))
        }
    };

    match target.find('*') {
        None => {
            let path = Path::new(target);
            if !path.exists() {
                return missing(path);
            }
            if path.is_dir() {
                std::fs::remove_dir_all(path)
            } else {
                std::fs::remove_file(path)
            }
        }
        Some(index) => {
            let (prefix, suffix) = target.split_at(index);
            let base = Path::new(prefix.trim_end_matches('/'));
            if base.as_os_str().is_empty() || !base.exists() {
                return missing(base);
            }
            let extension = suffix
                .rsplit('.')
                .next()
                .filter(|ext| !ext.is_empty() && !ext.contains('*'))
                .map(str::to_string);
            prune(base, extension.as_deref())
        }
    }
}

/// Removes matching entries below `dir`: everything when `extension` is
/// `None`, only files with that extension otherwise.
fn prune(dir: &Path, extension: Option<&str>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            match extension {
                None => std::fs::remove_dir_all(&path)?,
                Some(_) => prune(&path, extension)?,
            }
        } else {
            let matches = match extension {
                None => true,
                Some(ext) => path.extension().is_some_and(|e| e == ext),
            };
            if matches {
                std::fs::remove_file(&path)?;
            }
        }
    }
    Ok(())
}

/// Schema validation collaborator used by the CLI.
///
/// Typed deserialisation already rejected structurally invalid
/// configuration, so this implementation logs and accepts. A JSON Schema
/// validator can be swapped in at the same seam.
pub struct AcceptingValidator;

impl SchemaValidator for AcceptingValidator {
    fn validate(&self, _value: &serde_json::Value, schema_id: &str) -> Result<(), ValidationError> {
        debug!(schema = schema_id, "configuration accepted");
        Ok(())
    }
}
