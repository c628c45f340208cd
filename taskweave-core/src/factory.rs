//! The task-factory contract and the composite factory that sequences
//! every configured domain under one umbrella task.

use tracing::{debug, info};

use crate::build;
use crate::config::{BuildSection, DependencySection, DeploySection, Parameters};
use crate::contract::{Engine, SchemaValidator};
use crate::deploy;
use crate::error::ConfigError;
use crate::path::PathConfig;
use crate::task::{name, HelpOption, RegisteredTask, SequenceStep, TaskAction, TaskSet};
use crate::vendor;

/// Everything a factory needs to construct its tasks: the collaborator
/// seams, the shared path roots and the CLI parameters.
pub struct FactoryContext<'a> {
    pub engine: &'a dyn Engine,
    pub validator: &'a dyn SchemaValidator,
    pub paths: &'a PathConfig,
    pub parameters: Parameters,
}

/// One build domain's task factory.
///
/// `construct` validates and normalises the domain configuration, registers
/// the domain's tasks with the engine and returns their names. Registration
/// is all-or-nothing: any configuration error aborts before the first task
/// is handed to the engine.
pub trait TaskFactory {
    /// The configuration key this factory answers to.
    fn key(&self) -> &'static str;

    fn construct(&self, ctx: &FactoryContext<'_>) -> Result<TaskSet, ConfigError>;
}

const PRODUCTION_HELP: &str =
    "Build for production, will minify and strip everything it can. Very slow.";
const WATCH_HELP: &str = "Watch files for changes to re-run.";

/// Iterates the configured domains of one task group and registers the
/// umbrella task sequencing all of their sub-tasks.
pub struct CompositeTaskFactory {
    name: &'static str,
    description: &'static str,
    factories: Vec<Box<dyn TaskFactory>>,
}

impl CompositeTaskFactory {
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            factories: Vec::new(),
        }
    }

    /// The umbrella task name this composite registers.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn add(&mut self, factory: Box<dyn TaskFactory>) {
        self.factories.push(factory);
    }

    /// Constructs every configured domain in declared order and registers
    /// the umbrella task: all clean tasks as one parallel group, then every
    /// build task in order, then every watch task in order.
    ///
    /// An umbrella with zero collected tasks is still registered; invoking
    /// it fails with `NoTasksConfigured` rather than silently succeeding.
    pub fn construct(&self, ctx: &FactoryContext<'_>) -> Result<TaskSet, ConfigError> {
        let mut set = TaskSet::default();
        for factory in &self.factories {
            debug!(domain = factory.key(), "constructing domain tasks");
            set.merge(factory.construct(ctx)?);
        }
        set.options.push(HelpOption::new("production", PRODUCTION_HELP));
        set.options.push(HelpOption::new("watch", WATCH_HELP));

        let mut steps = Vec::new();
        if !set.clean.is_empty() {
            steps.push(SequenceStep::Parallel(set.clean.clone()));
        }
        steps.extend(set.build.iter().cloned().map(SequenceStep::Single));
        steps.extend(set.watch.iter().cloned().map(SequenceStep::Single));

        info!(
            umbrella = self.name,
            build = set.build.len(),
            clean = set.clean.len(),
            watch = set.watch.len(),
            "registering umbrella task"
        );
        ctx.engine.register_task(RegisteredTask {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            action: TaskAction::Sequence(steps),
            options: set.options.clone(),
        });
        Ok(set)
    }
}

/// Builds the `build` group composite from its configured domain keys.
/// Unknown keys never reach this point; they are dropped at deserialisation.
pub fn build_factory(section: BuildSection) -> CompositeTaskFactory {
    let mut composite = CompositeTaskFactory::new(
        name::BUILD,
        "Clean and build script, stylesheet and template sources.",
    );
    if let Some(config) = section.bundle {
        composite.add(Box::new(build::bundle(config)));
    }
    if let Some(config) = section.styles {
        composite.add(Box::new(build::styles(config)));
    }
    if let Some(config) = section.templates {
        composite.add(Box::new(build::templates(config)));
    }
    composite
}

/// Builds the `dependency` group composite.
pub fn dependency_factory(section: DependencySection) -> CompositeTaskFactory {
    let mut composite = CompositeTaskFactory::new(
        name::DEPENDENCY,
        "Clean and build dependencies into local libraries.",
    );
    if let Some(targets) = section.normalise {
        composite.add(Box::new(vendor::VendorFactory::new(targets)));
    }
    if let Some(setting) = section.clean {
        composite.add(Box::new(vendor::VendorCleanFactory::new(setting)));
    }
    composite
}

/// Builds the `deploy` group composite.
pub fn deploy_factory(section: DeploySection) -> CompositeTaskFactory {
    let mut composite = CompositeTaskFactory::new(
        name::DEPLOY,
        "Deploy build products to the configured targets.",
    );
    if let Some(config) = section.sync {
        composite.add(Box::new(deploy::SyncFactory::new(config)));
    }
    composite
}
