use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::TempDir;

/// Creates a project directory with a config file declaring all path roots
/// and a single bundle build target.
fn create_project() -> TempDir {
    let dir = TempDir::new().expect("Creating temp project dir failed");
    write(
        dir.path().join("taskweave.yml"),
        b"path:\n  source: source\n  destination: product\n  dependency: dependency\n  library: library\nbuild:\n  bundle:\n    source: js\n",
    )
    .expect("Writing temp config failed");
    dir
}

fn taskweave() -> Command {
    Command::cargo_bin("taskweave").expect("Binary exists")
}

#[test]
fn build_cli_happy_flow_prints_plan_and_completes() {
    let project = create_project();

    // Seed a stale build product so the clean task has something to delete.
    std::fs::create_dir_all(project.path().join("product/js")).unwrap();
    write(project.path().join("product/js/stale.js"), b"x").unwrap();

    taskweave()
        .current_dir(project.path())
        .arg("build")
        .arg("--config")
        .arg("taskweave.yml")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("build: 1 build, 1 clean, 0 watch task(s) registered")
                .and(predicate::str::contains("build-bundle"))
                .and(predicate::str::contains("build completed")),
        );

    assert!(!project.path().join("product/js/stale.js").exists());
}

#[test]
fn watch_flag_adds_watch_tasks_to_the_plan() {
    let project = create_project();

    taskweave()
        .current_dir(project.path())
        .arg("build")
        .arg("--config")
        .arg("taskweave.yml")
        .arg("--watch")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("1 watch task(s) registered")
                .and(predicate::str::contains("build-bundle-watch")),
        );
}

#[test]
fn umbrella_help_lists_domain_and_shared_options() {
    let project = create_project();

    taskweave()
        .current_dir(project.path())
        .arg("build")
        .arg("--config")
        .arg("taskweave.yml")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Clean and build script, stylesheet and template sources.")
                .and(predicate::str::contains("--bundle"))
                .and(predicate::str::contains("Build script sources into bundles."))
                .and(predicate::str::contains("--production"))
                .and(predicate::str::contains("--watch")),
        );
}

#[test]
fn empty_group_fails_with_no_tasks_configured() {
    let project = create_project();

    taskweave()
        .current_dir(project.path())
        .arg("dependency")
        .arg("--config")
        .arg("taskweave.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no tasks were configured, make sure your configuration is correct",
        ));
}

#[test]
fn invalid_yaml_fails_at_parse_time() {
    let project = TempDir::new().unwrap();
    write(project.path().join("taskweave.yml"), b"path: [unclosed\n").unwrap();

    taskweave()
        .current_dir(project.path())
        .arg("build")
        .arg("--config")
        .arg("taskweave.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config YAML"));
}

#[test]
fn missing_source_root_fails_during_construction() {
    let project = TempDir::new().unwrap();
    write(
        project.path().join("taskweave.yml"),
        b"path:\n  destination: product\nbuild:\n  bundle:\n    source: js\n",
    )
    .unwrap();

    taskweave()
        .current_dir(project.path())
        .arg("build")
        .arg("--config")
        .arg("taskweave.yml")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("task graph construction failed")
                .and(predicate::str::contains("has no \"source\" root")),
        );
}
