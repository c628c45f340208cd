//! Build-domain factories: script bundling, stylesheet compilation and
//! template compilation.
//!
//! The three domains share one construction path and differ only in their
//! static [`BuildDomain`] table: task names, default subdirectories, glob
//! extensions, canonical marker and default stage sequence. Sources resolve
//! against the `source` root, destinations against the `destination` root.

use tracing::info;

use crate::config::{normalise_build_target, BuildDefaults, BuildTarget, Parameters, RawBuildTarget};
use crate::error::ConfigError;
use crate::factory::{FactoryContext, TaskFactory};
use crate::path::{globalise, resolve_destination, resolve_source};
use crate::plugin::{self, DomainStages, Marker, Stage};
use crate::task::{name, HelpOption, PipelineSpec, RegisteredTask, TaskAction, TaskSet};

const SOURCE_ROOT: &str = "source";
const DESTINATION_ROOT: &str = "destination";

/// Static description of one build domain.
pub struct BuildDomain {
    key: &'static str,
    help: &'static str,
    schema: &'static str,
    build_task: &'static str,
    clean_task: &'static str,
    watch_task: &'static str,
    defaults: BuildDefaults,
    /// Glob appended to resolved source directories.
    source_glob: &'static str,
    /// Glob appended to destinations when deriving the clean target.
    output_glob: &'static str,
    marker: Marker,
    stages: fn(&BuildTarget, Parameters) -> Vec<Stage>,
}

static BUNDLE: BuildDomain = BuildDomain {
    key: "bundle",
    help: "Build script sources into bundles.",
    schema: "build-bundle",
    build_task: name::BUILD_BUNDLE,
    clean_task: name::BUILD_BUNDLE_CLEAN,
    watch_task: name::BUILD_BUNDLE_WATCH,
    defaults: BuildDefaults {
        source: "js",
        destination: "js",
    },
    source_glob: "**/*.js",
    output_glob: "**/*.js",
    marker: Marker::Bundle,
    stages: bundle_stages,
};

static STYLES: BuildDomain = BuildDomain {
    key: "styles",
    help: "Build stylesheet sources.",
    schema: "build-styles",
    build_task: name::BUILD_STYLES,
    clean_task: name::BUILD_STYLES_CLEAN,
    watch_task: name::BUILD_STYLES_WATCH,
    defaults: BuildDefaults {
        source: "less",
        destination: "css",
    },
    source_glob: "**/*.less",
    output_glob: "**/*.css",
    marker: Marker::Styles,
    stages: styles_stages,
};

static TEMPLATES: BuildDomain = BuildDomain {
    key: "templates",
    help: "Build markup templates.",
    schema: "build-templates",
    build_task: name::BUILD_TEMPLATES,
    clean_task: name::BUILD_TEMPLATES_CLEAN,
    watch_task: name::BUILD_TEMPLATES_WATCH,
    defaults: BuildDefaults {
        source: "twig",
        destination: "html",
    },
    source_glob: "**/*.twig",
    output_glob: "**/*.html",
    marker: Marker::Templates,
    stages: templates_stages,
};

fn bundle_stages(target: &BuildTarget, parameters: Parameters) -> Vec<Stage> {
    let mut stages = vec![Stage::Bundle {
        options: target.configuration.clone(),
    }];
    if parameters.production {
        stages.push(Stage::Minify);
    }
    stages
}

fn styles_stages(target: &BuildTarget, parameters: Parameters) -> Vec<Stage> {
    let mut stages = vec![Stage::CompileStyles {
        options: target.configuration.clone(),
    }];
    if parameters.production {
        stages.push(Stage::Minify);
    }
    stages
}

fn templates_stages(target: &BuildTarget, _parameters: Parameters) -> Vec<Stage> {
    vec![Stage::CompileTemplates {
        data: target.configuration.clone(),
    }]
}

/// Factory for one build domain, owning its raw configuration.
pub struct BuildDomainFactory {
    domain: &'static BuildDomain,
    config: RawBuildTarget,
}

/// Script-bundling factory.
pub fn bundle(config: RawBuildTarget) -> BuildDomainFactory {
    BuildDomainFactory {
        domain: &BUNDLE,
        config,
    }
}

/// Stylesheet-compilation factory.
pub fn styles(config: RawBuildTarget) -> BuildDomainFactory {
    BuildDomainFactory {
        domain: &STYLES,
        config,
    }
}

/// Template-compilation factory.
pub fn templates(config: RawBuildTarget) -> BuildDomainFactory {
    BuildDomainFactory {
        domain: &TEMPLATES,
        config,
    }
}

impl TaskFactory for BuildDomainFactory {
    fn key(&self) -> &'static str {
        self.domain.key
    }

    fn construct(&self, ctx: &FactoryContext<'_>) -> Result<TaskSet, ConfigError> {
        let domain = self.domain;

        let value = serde_json::to_value(&self.config)?;
        ctx.validator
            .validate(&value, domain.schema)
            .map_err(|source| ConfigError::Schema {
                schema: domain.schema.to_string(),
                source,
            })?;

        let target = normalise_build_target(self.config.clone(), &domain.defaults, ctx.parameters);

        let sources = target
            .source
            .iter()
            .map(|source| {
                resolve_source(ctx.paths, SOURCE_ROOT, source)
                    .map(|resolved| globalise(&resolved, domain.source_glob))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let destinations: Vec<String> = target
            .destination
            .iter()
            .map(|destination| resolve_destination(ctx.paths, DESTINATION_ROOT, destination))
            .collect();

        let stages = plugin::resolve(
            &target.plugins,
            &DomainStages {
                marker: domain.marker,
                stages: (domain.stages)(&target, ctx.parameters),
            },
        )?;

        // Every task is prepared before the first registration so a failure
        // above never leaves a partial domain behind.
        let mut tasks = vec![RegisteredTask {
            name: domain.build_task.to_string(),
            description: None,
            action: TaskAction::Pipeline(vec![PipelineSpec {
                sources: sources.clone(),
                stages,
                destinations: destinations.clone(),
            }]),
            options: Vec::new(),
        }];
        let mut set = TaskSet {
            build: vec![domain.build_task.to_string()],
            options: vec![HelpOption::new(domain.key, domain.help)],
            ..TaskSet::default()
        };

        if target.clean {
            let targets = destinations
                .iter()
                .map(|destination| globalise(destination, domain.output_glob))
                .collect();
            tasks.push(RegisteredTask {
                name: domain.clean_task.to_string(),
                description: None,
                action: TaskAction::Clean { targets },
                options: Vec::new(),
            });
            set.clean.push(domain.clean_task.to_string());
        }

        if target.watch {
            tasks.push(RegisteredTask {
                name: domain.watch_task.to_string(),
                description: None,
                action: TaskAction::Watch {
                    globs: sources,
                    rerun: vec![domain.build_task.to_string()],
                },
                options: Vec::new(),
            });
            set.watch.push(domain.watch_task.to_string());
        }

        info!(
            domain = domain.key,
            tasks = tasks.len(),
            "registering build domain tasks"
        );
        for task in tasks {
            ctx.engine.register_task(task);
        }
        Ok(set)
    }
}
