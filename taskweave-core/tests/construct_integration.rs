//! Integration tests: full task-group construction against mocked
//! collaborators, covering the cross-domain sequencing guarantees.

use std::sync::{Arc, Mutex};

use taskweave_core::config::{BuildSection, DependencySection, Parameters};
use taskweave_core::contract::{MockEngine, MockSchemaValidator};
use taskweave_core::factory::{self, FactoryContext};
use taskweave_core::path::PathConfig;
use taskweave_core::task::{name, RegisteredTask, SequenceStep, TaskAction};

fn recording_engine() -> (MockEngine, Arc<Mutex<Vec<RegisteredTask>>>) {
    let registered = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&registered);
    let mut engine = MockEngine::new();
    engine.expect_register_task().returning(move |task| {
        sink.lock().unwrap().push(task);
    });
    (engine, registered)
}

fn accepting_validator() -> MockSchemaValidator {
    let mut validator = MockSchemaValidator::new();
    validator.expect_validate().returning(|_, _| Ok(()));
    validator
}

fn paths() -> PathConfig {
    let mut paths = PathConfig::new();
    paths.insert("source", "source");
    paths.insert("destination", "product");
    paths.insert("dependency", "dependency");
    paths.insert("library", "library");
    paths
}

fn umbrella_steps(registered: &[RegisteredTask], umbrella: &str) -> Vec<SequenceStep> {
    let task = registered
        .iter()
        .find(|task| task.name == umbrella)
        .expect("umbrella task registered");
    match &task.action {
        TaskAction::Sequence(steps) => steps.clone(),
        other => panic!("umbrella must be a sequence, got {other:?}"),
    }
}

/// Position classes of the umbrella sequence: the parallel clean group must
/// come strictly before every build task, and every build task strictly
/// before every watch task.
fn assert_clean_build_watch_order(steps: &[SequenceStep], watch_names: &[&str]) {
    assert!(
        matches!(steps.first(), Some(SequenceStep::Parallel(_))),
        "clean group must lead the sequence"
    );
    let singles: Vec<&str> = steps[1..]
        .iter()
        .map(|step| match step {
            SequenceStep::Single(name) => name.as_str(),
            SequenceStep::Parallel(_) => panic!("only one parallel clean group expected"),
        })
        .collect();
    let first_watch = singles
        .iter()
        .position(|name| watch_names.contains(name))
        .unwrap_or(singles.len());
    for (index, name) in singles.iter().enumerate() {
        if watch_names.contains(name) {
            assert!(index >= first_watch, "watch task {name} placed before builds");
        } else {
            assert!(index < first_watch, "build task {name} placed after watches");
        }
    }
}

#[test]
fn build_group_sequences_clean_before_build_before_watch() {
    let (engine, registered) = recording_engine();
    let validator = accepting_validator();
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

    let section: BuildSection = serde_yaml::from_str(
        r#"
bundle:
  source: js
styles:
  source: less
templates:
  clean: false
"#,
    )
    .unwrap();

    let set = factory::build_factory(section).construct(&ctx).unwrap();
    assert_eq!(
        set.build,
        vec![name::BUILD_BUNDLE, name::BUILD_STYLES, name::BUILD_TEMPLATES]
    );
    assert_eq!(set.clean, vec![name::BUILD_BUNDLE_CLEAN, name::BUILD_STYLES_CLEAN]);
    assert_eq!(
        set.watch,
        vec![
            name::BUILD_BUNDLE_WATCH,
            name::BUILD_STYLES_WATCH,
            name::BUILD_TEMPLATES_WATCH
        ]
    );

    let registered = registered.lock().unwrap();
    let steps = umbrella_steps(&registered, name::BUILD);
    assert_clean_build_watch_order(
        &steps,
        &[
            name::BUILD_BUNDLE_WATCH,
            name::BUILD_STYLES_WATCH,
            name::BUILD_TEMPLATES_WATCH,
        ],
    );
}

#[test]
fn dependency_group_collects_normalise_and_clean() {
    let (engine, registered) = recording_engine();
    let validator = accepting_validator();
    let paths = paths();
    let ctx = FactoryContext {
        engine: &engine,
        validator: &validator,
        paths: &paths,
        parameters: Parameters::default(),
    };

    let section: DependencySection = serde_yaml::from_str(
        r#"
normalise:
  jquery: jquery/dist/jquery.js
  moment:
    source: moment/min/moment.min.js
    destination: js/moment.min.js
clean: true
"#,
    )
    .unwrap();

    let set = factory::dependency_factory(section).construct(&ctx).unwrap();
    assert_eq!(set.build, vec![name::DEPENDENCY_NORMALISE]);
    assert_eq!(set.clean, vec![name::DEPENDENCY_CLEAN]);
    assert!(set.watch.is_empty());

    let registered = registered.lock().unwrap();
    let steps = umbrella_steps(&registered, name::DEPENDENCY);
    assert_eq!(
        steps,
        vec![
            SequenceStep::Parallel(vec![name::DEPENDENCY_CLEAN.to_string()]),
            SequenceStep::Single(name::DEPENDENCY_NORMALISE.to_string()),
        ]
    );
}

#[test]
fn empty_group_registers_a_failing_umbrella() {
    let (engine, registered) = recording_engine();
    let validator = accepting_validator();
    let paths = paths();
    let ctx = FactoryContext {
        engine: &engine,
        validator: &validator,
        paths: &paths,
        parameters: Parameters::default(),
    };

    let set = factory::dependency_factory(DependencySection::default())
        .construct(&ctx)
        .unwrap();
    assert!(set.is_empty());

    let registered = registered.lock().unwrap();
    let steps = umbrella_steps(&registered, name::DEPENDENCY);
    assert!(steps.is_empty());
}

#[test]
fn repeated_construction_registers_the_same_graph() {
    let (engine, registered) = recording_engine();
    let validator = accepting_validator();
    let paths = paths();
    let ctx = FactoryContext {
        engine: &engine,
        validator: &validator,
        paths: &paths,
        parameters: Parameters::default(),
    };

    let section: BuildSection = serde_yaml::from_str("bundle:\n  source: js\n").unwrap();
    let composite = factory::build_factory(section);
    let first = composite.construct(&ctx).unwrap();
    let second = composite.construct(&ctx).unwrap();
    assert_eq!(first, second);

    // Same names registered both times; the engine overwrites on re-register.
    let registered = registered.lock().unwrap();
    let half = registered.len() / 2;
    let first_names: Vec<&str> = registered[..half].iter().map(|t| t.name.as_str()).collect();
    let second_names: Vec<&str> = registered[half..].iter().map(|t| t.name.as_str()).collect();
    assert_eq!(first_names, second_names);
}
