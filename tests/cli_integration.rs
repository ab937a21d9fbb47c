//! Integration tests for the command line
//!
//! These tests run the binary against definition files in a temp directory:
//! - Checking definitions
//! - Showing entities
//! - Driving an entity through states
//! - Walking a hierarchy
//! - Reading configuration

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Helper to get the traitflux binary path
fn traitflux_binary() -> PathBuf {
    // When running tests, the binary is in target/debug/traitflux
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps
    path.push("traitflux");
    path
}

/// Helper to run traitflux with a private config directory
fn run_traitflux(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(traitflux_binary())
        .env("TRAITFLUX_DIR", dir)
        .env_remove("TRAITFLUX_CONFIG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute traitflux")
}

fn run_traitflux_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_traitflux(dir, args);
    String::from_utf8_lossy(&output.stdout).to_string()
}

const PANTRY: &str = r#"
stereotypes:
  container: [container, selected, used]
  glass: [breakable]

entities:
  - name: spice
    first: sealed
    states:
      sealed: [open]
    include: [edible]
  - name: jar
    first: sealed
    final: destroyed
    states:
      sealed: [open, destroyed]
      open: [empty, destroyed]
      empty: [destroyed]
    stereotypes: [container, glass]
    exclude: [used]
    stateful:
      open: [pourable]
    bag:
      flour: 3
  - name: shelf
    first: standing
    states:
      standing: [fallen]
    include: [furniture]
    children: [jar, spice]
"#;

/// Temp dir with a config pointing logs inside it and a pantry definition
fn setup() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let config = format!(
        "paths:\n  definitions: {}\n  logs: {}\noutput:\n  color: false\n",
        temp.path().join("definitions").display(),
        temp.path().join("logs").display()
    );
    fs::write(temp.path().join("traitflux.yaml"), config).unwrap();

    let defs = temp.path().join("definitions");
    fs::create_dir_all(&defs).unwrap();
    let file = defs.join("pantry.yaml");
    fs::write(&file, PANTRY).unwrap();

    (temp, file)
}

#[test]
fn test_check_valid_file() {
    let (temp, file) = setup();
    let output = run_traitflux(temp.path(), &["check", file.to_str().unwrap()]);

    assert!(output.status.success(), "check failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("3 entities"), "Should count entities: {}", stdout);
}

#[test]
fn test_check_resolves_name_under_definitions() {
    let (temp, _file) = setup();
    let output = run_traitflux(temp.path(), &["check", "pantry"]);
    assert!(output.status.success(), "check by name failed: {:?}", output);
}

#[test]
fn test_check_rejects_unknown_stereotype() {
    let (temp, _file) = setup();
    let bad = temp.path().join("bad.yaml");
    fs::write(
        &bad,
        "entities:\n  - name: cup\n    first: full\n    stereotypes: [porcelain]\n",
    )
    .unwrap();

    let output = run_traitflux(temp.path(), &["check", bad.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("porcelain"), "Should name the stereotype: {}", stderr);
}

#[test]
fn test_check_directory_with_broken_file_fails() {
    let (temp, file) = setup();
    let defs = file.parent().unwrap();
    fs::write(defs.join("broken.yaml"), "entities: [[[").unwrap();

    let output = run_traitflux(temp.path(), &["check", defs.to_str().unwrap()]);
    assert!(!output.status.success(), "check should fail: {:?}", output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.yaml"), "Should name the file: {}", stderr);
}

#[test]
fn test_show_json() {
    let (temp, file) = setup();
    let stdout = run_traitflux_stdout(temp.path(), &["show", file.to_str().unwrap(), "jar", "-o", "json"]);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("show should print JSON");
    let jar = &parsed[0];
    assert_eq!(jar["name"], "jar");
    assert_eq!(jar["state"], "sealed");
    assert_eq!(jar["traits"], serde_json::json!(["breakable", "container", "selected"]));
    assert_eq!(jar["bag"]["flour"], 3);
    assert_eq!(jar["parent"], "shelf");
}

#[test]
fn test_show_unknown_entity() {
    let (temp, file) = setup();
    let output = run_traitflux(temp.path(), &["show", file.to_str().unwrap(), "teapot"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("teapot"), "Should name the entity: {}", stderr);
}

#[test]
fn test_flux_reports_each_step() {
    let (temp, file) = setup();
    let stdout = run_traitflux_stdout(
        temp.path(),
        &["flux", file.to_str().unwrap(), "jar", "open", "sealed", "destroyed", "-o", "json"],
    );

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("flux should print JSON");
    let steps = parsed["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 3);

    assert_eq!(steps[0]["moved"], true);
    assert!(steps[0]["traits"].as_array().unwrap().contains(&serde_json::json!("pourable")));

    assert_eq!(steps[1]["moved"], false);
    assert_eq!(steps[1]["state"], "open");

    assert_eq!(steps[2]["moved"], true);
    assert_eq!(steps[2]["state"], "destroyed");
}

#[test]
fn test_walk_prints_tree() {
    let (temp, file) = setup();
    let stdout = run_traitflux_stdout(temp.path(), &["walk", file.to_str().unwrap(), "shelf"]);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "Unexpected walk output: {}", stdout);
    assert!(lines[0].starts_with("shelf"));
    assert!(lines[1].starts_with("  jar"));
    assert!(lines[2].starts_with("  spice"));
}

#[test]
fn test_config_get() {
    let (temp, _file) = setup();
    let stdout = run_traitflux_stdout(temp.path(), &["config", "get", "output.color"]);
    assert_eq!(stdout.trim(), "false");

    let output = run_traitflux(temp.path(), &["config", "get", "no.such.key"]);
    assert!(!output.status.success());
}

#[test]
fn test_logs_written_to_configured_dir() {
    let (temp, file) = setup();
    run_traitflux(temp.path(), &["check", file.to_str().unwrap()]);
    assert!(temp.path().join("logs").join("traitflux.log").exists());
}
