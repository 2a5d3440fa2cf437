//! Integration tests for the cbuild binary.
//!
//! The external builder is a small shell script, so these tests only run on
//! unix hosts.

#![cfg(unix)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BUILDER_SCRIPT: &str = r#"
cat > /dev/null
case "$1" in
  build) printf '{"css":"  .app { color: red }  ","js":"app()"}' ;;
  styles) printf '{"output":"h1 {}"}' ;;
  scripts) printf '{"output":"scripts()","extraJs":"extra()"}' ;;
  *) printf '{"output":""}' ;;
esac
"#;

const FAILING_SCRIPT: &str = r#"
cat > /dev/null
echo 'failed to lookup "missing/dep"' >&2
exit 1
"#;

fn project(task_file: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("builder.sh"), BUILDER_SCRIPT).unwrap();
    fs::write(dir.path().join("failing.sh"), FAILING_SCRIPT).unwrap();
    fs::write(dir.path().join("cbuild.toml"), task_file).unwrap();
    dir
}

fn cbuild(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cbuild").unwrap();
    cmd.current_dir(dir)
        .env_remove("CBUILD_OUTPUT")
        .env_remove("CBUILD_BASE")
        .env_remove("CBUILD_PREFIX")
        .env_remove("CBUILD_DEV")
        .env_remove("CBUILD_VERBOSE")
        .arg("--no-color");
    cmd
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

const TWO_TARGETS: &str = r#"
[builder]
command = "sh"
args = ["builder.sh"]

[options]
output = "build"

[targets.app]

[targets.theme]
assetType = "styles"
"#;

#[test]
fn test_build_all_targets() {
    let dir = project(TWO_TARGETS);

    cbuild(dir.path()).arg("build").assert().success();

    assert_eq!(read(dir.path().join("build/app.css")), ".app { color: red }");
    let js = read(dir.path().join("build/app.js"));
    assert!(js.contains("require.register"));
    assert!(js.ends_with("app()"));

    assert_eq!(read(dir.path().join("build/theme.css")), "h1 {}");
    assert!(!dir.path().join("build/theme.js").exists());
}

#[test]
fn test_build_named_target_only() {
    let dir = project(TWO_TARGETS);

    cbuild(dir.path()).args(["build", "theme"]).assert().success();

    assert!(dir.path().join("build/theme.css").is_file());
    assert!(!dir.path().join("build/app.css").exists());
}

#[test]
fn test_build_parallel() {
    let dir = project(TWO_TARGETS);

    cbuild(dir.path())
        .args(["build", "--parallel"])
        .assert()
        .success();

    assert!(dir.path().join("build/app.js").is_file());
    assert!(dir.path().join("build/theme.css").is_file());
}

#[test]
fn test_scripts_target_joins_extra_js() {
    let dir = project(
        r#"
[builder]
command = "sh"
args = ["builder.sh"]

[targets.bundle]
output = "out"
assetType = "scripts"
"#,
    );

    cbuild(dir.path()).arg("build").assert().success();

    let js = read(dir.path().join("out/bundle.js"));
    assert!(js.ends_with("scripts()\nextra()"));
    assert!(!dir.path().join("out/bundle.css").exists());
}

#[test]
fn test_unknown_target_fails() {
    let dir = project(TWO_TARGETS);

    cbuild(dir.path())
        .args(["build", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown target 'missing'"));
}

#[test]
fn test_builder_failure_writes_nothing() {
    let dir = project(
        r#"
[builder]
command = "sh"
args = ["failing.sh"]

[targets.app]
output = "build"
"#,
    );

    cbuild(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing/dep"));

    assert!(!dir.path().join("build").exists());
}

#[test]
fn test_builder_flag_overrides_task_file() {
    let dir = project(
        r#"
[targets.app]
output = "build"
"#,
    );

    cbuild(dir.path()).arg("build").assert().failure();

    cbuild(dir.path())
        .args(["build", "--builder", "sh builder.sh"])
        .assert()
        .success();
    assert!(dir.path().join("build/app.css").is_file());
}

#[test]
fn test_env_overrides_output() {
    let dir = project(TWO_TARGETS);

    cbuild(dir.path())
        .args(["build", "app"])
        .env("CBUILD_OUTPUT", "dist")
        .assert()
        .success();

    assert!(dir.path().join("dist/app.css").is_file());
    assert!(!dir.path().join("build").exists());
}

#[test]
fn test_check_valid_task_file() {
    let dir = project(TWO_TARGETS);

    cbuild(dir.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("All targets are valid"));
}

#[test]
fn test_check_reports_missing_output() {
    let dir = project(
        r#"
[targets.app]
output = "build"

[targets.broken]
dev = true
"#,
    );

    cbuild(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'broken' is missing required option 'output'"));
}

#[test]
fn test_check_schema_prints_json() {
    let dir = TempDir::new().unwrap();

    let output = cbuild(dir.path())
        .args(["check", "--schema"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let schema: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(schema["properties"]["assetType"].is_object());
}

#[test]
fn test_missing_task_file() {
    let dir = TempDir::new().unwrap();

    cbuild(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("task file not found"));
}
