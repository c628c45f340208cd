//! Dependency vendoring: normalising third-party sources into local
//! libraries, plus the explicit dependency clean task.
//!
//! Each vendoring target resolves its source against the required
//! `dependency` root. When no destination is given, it is inferred from the
//! `library` root joined with the source glob's single extension. The
//! default pipeline minifies `*.js` inputs and concatenates everything into
//! one inferred filename, so even a single file is renamed predictably.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::config::{CleanSetting, RawVendorTarget};
use crate::error::ConfigError;
use crate::factory::{FactoryContext, TaskFactory};
use crate::path::{self, glob_extension, resolve_destination, resolve_source, PathConfig};
use crate::plugin::{self, DomainStages, Marker, Plugin, Stage};
use crate::task::{name, HelpOption, PipelineSpec, RegisteredTask, TaskAction, TaskSet};

const DEPENDENCY_ROOT: &str = "dependency";
const LIBRARY_ROOT: &str = "library";
const NORMALISE_SCHEMA: &str = "dependency-normalise";

/// A fully resolved vendoring target.
#[derive(Debug, Clone, PartialEq)]
struct VendorTarget {
    sources: Vec<String>,
    destination: String,
    filename: String,
    plugins: Vec<Plugin>,
}

/// Extension of a source value: glob-derived for globs, plain path
/// extension otherwise.
fn source_extension(source: &str) -> Option<String> {
    if source.contains('*') {
        glob_extension(source)
    } else {
        Path::new(source)
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
    }
}

fn extension_of(value: &str) -> Option<String> {
    Path::new(value)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
}

/// Normalises one vendoring target. Pure and deterministic.
fn normalise_target(
    key: &str,
    raw: &RawVendorTarget,
    paths: &PathConfig,
) -> Result<VendorTarget, ConfigError> {
    let (source, destination, plugins) = match raw {
        RawVendorTarget::Source(source) => (vec![source.clone()], None, Vec::new()),
        RawVendorTarget::Record(record) => (
            record
                .source
                .clone()
                .ok_or_else(|| ConfigError::MissingSource {
                    key: key.to_string(),
                })?
                .into_vec(),
            record.destination.clone(),
            record.plugins.clone().unwrap_or_default(),
        ),
    };

    // An explicit empty list is as sourceless as an absent field.
    if source.is_empty() {
        return Err(ConfigError::MissingSource {
            key: key.to_string(),
        });
    }

    let sources = source
        .iter()
        .map(|source| resolve_source(paths, DEPENDENCY_ROOT, source))
        .collect::<Result<Vec<_>, _>>()?;
    // Destination and filename inference consult the first source entry.
    let primary = &sources[0];

    let (destination, basename) = match destination {
        Some(raw_destination) => {
            let basename = Path::new(&raw_destination)
                .file_name()
                .map(|base| base.to_string_lossy().into_owned());
            (
                resolve_destination(paths, LIBRARY_ROOT, &raw_destination),
                basename,
            )
        }
        None => match paths.get(LIBRARY_ROOT) {
            Some(library) => {
                let destination = match glob_extension(primary) {
                    Some(extension) => library.join(extension),
                    None => library.to_path_buf(),
                };
                (destination.to_string_lossy().into_owned(), None)
            }
            None => {
                return Err(ConfigError::MissingRoot {
                    root: LIBRARY_ROOT.to_string(),
                    path: key.to_string(),
                })
            }
        },
    };

    // Filename rules, first applicable wins: explicit destination basename
    // with an extension, then key joined with the source-derived extension,
    // then the bare key.
    let key_has_extension = extension_of(key).is_some();
    let filename = if !key_has_extension
        && basename
            .as_deref()
            .and_then(extension_of)
            .is_some()
    {
        basename.unwrap_or_default()
    } else if !key_has_extension {
        match source_extension(primary) {
            Some(extension) => format!("{key}.{extension}"),
            None => key.to_string(),
        }
    } else {
        key.to_string()
    };

    Ok(VendorTarget {
        sources,
        destination,
        filename,
        plugins,
    })
}

/// Factory for the `normalise` dependency domain.
pub struct VendorFactory {
    targets: BTreeMap<String, RawVendorTarget>,
}

impl VendorFactory {
    pub fn new(targets: BTreeMap<String, RawVendorTarget>) -> Self {
        Self { targets }
    }
}

impl TaskFactory for VendorFactory {
    fn key(&self) -> &'static str {
        "normalise"
    }

    fn construct(&self, ctx: &FactoryContext<'_>) -> Result<TaskSet, ConfigError> {
        let value = serde_json::to_value(&self.targets)?;
        ctx.validator
            .validate(&value, NORMALISE_SCHEMA)
            .map_err(|source| ConfigError::Schema {
                schema: NORMALISE_SCHEMA.to_string(),
                source,
            })?;

        let mut specs = Vec::new();
        for (key, raw) in &self.targets {
            let target = normalise_target(key, raw, ctx.paths)?;
            let defaults = DomainStages {
                marker: Marker::Normalise,
                stages: vec![
                    Stage::When {
                        pattern: "*.js".to_string(),
                        stage: Box::new(Stage::Minify),
                    },
                    Stage::Concat {
                        filename: target.filename.clone(),
                    },
                ],
            };
            let stages = plugin::resolve(&target.plugins, &defaults)?;
            specs.push(PipelineSpec {
                sources: target.sources,
                stages,
                destinations: vec![target.destination],
            });
        }

        info!(targets = specs.len(), "registering dependency normalise task");
        ctx.engine.register_task(RegisteredTask {
            name: name::DEPENDENCY_NORMALISE.to_string(),
            description: None,
            action: TaskAction::Pipeline(specs),
            options: Vec::new(),
        });
        Ok(TaskSet {
            build: vec![name::DEPENDENCY_NORMALISE.to_string()],
            options: vec![HelpOption::new("normalise", "Normalise dependencies.")],
            ..TaskSet::default()
        })
    }
}

/// Factory for the explicit dependency `clean` configuration.
///
/// `false` disables cleaning entirely; `true` derives `library/*`; an
/// explicit target always overrides the derived default.
pub struct VendorCleanFactory {
    setting: CleanSetting,
}

impl VendorCleanFactory {
    pub fn new(setting: CleanSetting) -> Self {
        Self { setting }
    }
}

impl TaskFactory for VendorCleanFactory {
    fn key(&self) -> &'static str {
        "clean"
    }

    fn construct(&self, ctx: &FactoryContext<'_>) -> Result<TaskSet, ConfigError> {
        let target = match &self.setting {
            CleanSetting::Flag(false) => return Ok(TaskSet::default()),
            CleanSetting::Target(target) => target.clone(),
            CleanSetting::Flag(true) => match ctx.paths.get(LIBRARY_ROOT) {
                Some(library) => path::globalise(&library.to_string_lossy(), "*"),
                None => return Err(ConfigError::MissingCleanTarget),
            },
        };

        ctx.engine.register_task(RegisteredTask {
            name: name::DEPENDENCY_CLEAN.to_string(),
            description: None,
            action: TaskAction::Clean {
                targets: vec![target],
            },
            options: Vec::new(),
        });
        Ok(TaskSet {
            clean: vec![name::DEPENDENCY_CLEAN.to_string()],
            options: vec![HelpOption::new("clean", "Clean dependencies.")],
            ..TaskSet::default()
        })
    }
}
