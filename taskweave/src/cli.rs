//! CLI interface: one umbrella command per task group.
//!
//! Each command loads the project configuration, constructs the group's
//! composite task factory against the plan engine and invokes the umbrella
//! task. All non-trivial logic lives in `taskweave-core`; this module is
//! argument exposure and orchestration only.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use taskweave_core::config::Parameters;
use taskweave_core::contract::Engine;
use taskweave_core::factory::{self, CompositeTaskFactory, FactoryContext};

use crate::engine::{AcceptingValidator, FsCleaner, PlanEngine};
use crate::load_config::{load_config, ProjectConfig};

/// CLI for taskweave: declarative clean/build/watch task graphs for file
/// pipelines.
#[derive(Parser)]
#[clap(
    name = "taskweave",
    version,
    about = "Construct and run declarative clean/build/watch task graphs for file pipelines"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean and build script, stylesheet and template sources
    Build(GroupArgs),
    /// Clean and build dependencies into local libraries
    Dependency(GroupArgs),
    /// Deploy build products to the configured targets
    Deploy(GroupArgs),
}

/// Flags shared by every task-group command.
#[derive(Args)]
pub struct GroupArgs {
    /// Path to the YAML project configuration
    #[clap(long)]
    pub config: PathBuf,

    /// Build for production, will minify and strip everything it can
    #[clap(long)]
    pub production: bool,

    /// Watch files for changes to re-run
    #[clap(long)]
    pub watch: bool,
}

impl GroupArgs {
    fn parameters(&self) -> Parameters {
        Parameters {
            production: self.production,
            watch: self.watch,
        }
    }
}

/// Extracted async CLI entrypoint for programmatic invocation and tests.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Build(args) => {
            let project = load_config(&args.config)?;
            let composite = factory::build_factory(project.build.clone());
            run_group(&project, composite, args.parameters()).await
        }
        Commands::Dependency(args) => {
            let project = load_config(&args.config)?;
            let composite = factory::dependency_factory(project.dependency.clone());
            run_group(&project, composite, args.parameters()).await
        }
        Commands::Deploy(args) => {
            let project = load_config(&args.config)?;
            let composite = factory::deploy_factory(project.deploy.clone());
            run_group(&project, composite, args.parameters()).await
        }
    }
}

async fn run_group(
    project: &ProjectConfig,
    composite: CompositeTaskFactory,
    parameters: Parameters,
) -> Result<()> {
    let engine = PlanEngine::new(FsCleaner);
    let validator = AcceptingValidator;
    let ctx = FactoryContext {
        engine: &engine,
        validator: &validator,
        paths: &project.path,
        parameters,
    };

    let name = composite.name();
    let set = composite
        .construct(&ctx)
        .context("task graph construction failed")?;
    tracing::info!(
        umbrella = name,
        build = set.build.len(),
        clean = set.clean.len(),
        watch = set.watch.len(),
        "task graph constructed"
    );
    println!(
        "{name}: {} build, {} clean, {} watch task(s) registered",
        set.build.len(),
        set.clean.len(),
        set.watch.len()
    );
    // One help line per configured domain, plus the shared flags.
    println!("{}", engine.task_help(name)?);

    engine
        .run_task(name)
        .await
        .with_context(|| format!("task \"{name}\" failed"))?;
    println!("{name} completed");
    Ok(())
}
