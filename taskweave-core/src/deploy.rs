//! Deployment domain: shipping build products to a remote target.
//!
//! The `sync` target uploads files matched under the `destination` root to
//! the configured remote locations. Deployment supports neither clean nor
//! watch tasks; its pipeline runs once per invocation.

use tracing::info;

use crate::config::{OneOrMany, RawSyncTarget};
use crate::error::ConfigError;
use crate::factory::{FactoryContext, TaskFactory};
use crate::path::{globalise, resolve_destination, resolve_source};
use crate::plugin::{self, DomainStages, Marker, Stage};
use crate::task::{name, HelpOption, PipelineSpec, RegisteredTask, TaskAction, TaskSet};

const SOURCE_ROOT: &str = "destination";
const DEPLOY_ROOT: &str = "deploy";
const SYNC_SCHEMA: &str = "deploy-sync";

/// Fully populated sync configuration.
#[derive(Debug, Clone, PartialEq)]
struct SyncTarget {
    source: Vec<String>,
    destination: Vec<String>,
    plugins: Vec<crate::plugin::Plugin>,
    configuration: serde_json::Value,
}

/// A record containing none of the known keys is the transport
/// configuration itself, mirroring the build-domain shorthand.
fn normalise_sync_target(raw: RawSyncTarget) -> SyncTarget {
    let shorthand = raw.source.is_none()
        && raw.destination.is_none()
        && raw.configuration.is_none()
        && !raw.rest.is_empty();
    let configuration = if shorthand {
        serde_json::Value::Object(raw.rest)
    } else {
        raw.configuration.unwrap_or(serde_json::Value::Null)
    };

    SyncTarget {
        source: raw
            .source
            .map(OneOrMany::into_vec)
            .unwrap_or_else(|| vec![String::new()]),
        destination: raw
            .destination
            .map(OneOrMany::into_vec)
            .unwrap_or_else(|| vec![String::new()]),
        plugins: raw.plugins.unwrap_or_default(),
        configuration,
    }
}

/// Factory for the `sync` deployment domain.
pub struct SyncFactory {
    config: RawSyncTarget,
}

impl SyncFactory {
    pub fn new(config: RawSyncTarget) -> Self {
        Self { config }
    }
}

impl TaskFactory for SyncFactory {
    fn key(&self) -> &'static str {
        "sync"
    }

    fn construct(&self, ctx: &FactoryContext<'_>) -> Result<TaskSet, ConfigError> {
        let value = serde_json::to_value(&self.config)?;
        ctx.validator
            .validate(&value, SYNC_SCHEMA)
            .map_err(|source| ConfigError::Schema {
                schema: SYNC_SCHEMA.to_string(),
                source,
            })?;

        let target = normalise_sync_target(self.config.clone());

        let sources = target
            .source
            .iter()
            .map(|source| {
                resolve_source(ctx.paths, SOURCE_ROOT, source)
                    .map(|resolved| globalise(&resolved, "**/*"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let destinations: Vec<String> = target
            .destination
            .iter()
            .map(|destination| resolve_destination(ctx.paths, DEPLOY_ROOT, destination))
            .collect();

        let stages = plugin::resolve(
            &target.plugins,
            &DomainStages {
                marker: Marker::Upload,
                stages: vec![Stage::Upload {
                    options: target.configuration.clone(),
                }],
            },
        )?;

        info!("registering deploy sync task");
        ctx.engine.register_task(RegisteredTask {
            name: name::DEPLOY_SYNC.to_string(),
            description: None,
            action: TaskAction::Pipeline(vec![PipelineSpec {
                sources,
                stages,
                destinations,
            }]),
            options: Vec::new(),
        });
        Ok(TaskSet {
            build: vec![name::DEPLOY_SYNC.to_string()],
            options: vec![HelpOption::new("sync", "Deploy build products.")],
            ..TaskSet::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parameters;
    use crate::contract::{MockEngine, MockSchemaValidator};
    use crate::path::PathConfig;
    use std::sync::{Arc, Mutex};

    fn paths() -> PathConfig {
        let mut paths = PathConfig::new();
        paths.insert("destination", "product");
        paths
    }

    #[test]
    fn shorthand_record_is_the_transport_configuration() {
        let raw: RawSyncTarget =
            serde_yaml::from_str("bucket: assets\nregion: eu-west-1\n").unwrap();
        let target = normalise_sync_target(raw);
        assert_eq!(target.configuration["bucket"], "assets");
        assert_eq!(target.configuration["region"], "eu-west-1");
    }

    #[test]
    fn sync_registers_a_single_upload_pipeline() {
        let registered = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&registered);
        let mut engine = MockEngine::new();
        engine.expect_register_task().returning(move |task| {
            sink.lock().unwrap().push(task);
        });
        let mut validator = MockSchemaValidator::new();
        validator.expect_validate().returning(|_, _| Ok(()));
        let paths = paths();
        let ctx = FactoryContext {
            engine: &engine,
            validator: &validator,
            paths: &paths,
            parameters: Parameters {
                production: false,
                watch: true,
            },
        };

        let set = SyncFactory::new(RawSyncTarget::default())
            .construct(&ctx)
            .unwrap();
        // Deployment never produces clean or watch tasks, regardless of flags.
        assert_eq!(set.build, vec![name::DEPLOY_SYNC]);
        assert!(set.clean.is_empty());
        assert!(set.watch.is_empty());

        let registered = registered.lock().unwrap();
        let TaskAction::Pipeline(specs) = &registered[0].action else {
            panic!("sync task must be a pipeline");
        };
        assert_eq!(specs[0].sources, vec!["product/**/*"]);
        assert_eq!(
            specs[0].stages,
            vec![Stage::Upload {
                options: serde_json::Value::Null
            }]
        );
    }
}
