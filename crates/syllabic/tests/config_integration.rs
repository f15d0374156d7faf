//! Configuration integration tests.
//!
//! Config discovery, format parsing and precedence, checked end to end
//! through `info --json`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("SYLLABIC_MAX_GRADE")
        .env_remove("SYLLABIC_MIN_READING_EASE")
        .env_remove("SYLLABIC_LOG_LEVEL");
    cmd
}

/// Run `info --json` from `dir` with extra env vars and return the `config` object.
fn config_json_with_env(dir: &Path, env: &[(&str, &str)]) -> Value {
    let mut command = cmd();
    for (key, value) in env {
        command.env(key, value);
    }
    let output = command
        .args(["-C", dir.to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    json["config"].clone()
}

fn config_json(dir: &Path) -> Value {
    config_json_with_env(dir, &[])
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn defaults_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = config_json(tmp.path());

    assert_eq!(config["log_level"], "info");
    assert!(config["config_file"].is_null());
    assert!(config["max_grade"].is_null());
    assert_eq!(config["max_input_bytes"], 5 * 1024 * 1024);
}

#[test]
fn discovers_dotfile_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".syllabic.toml"), "max_grade = 9.5\n").unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["max_grade"], 9.5);
    let reported = config["config_file"].as_str().unwrap();
    assert!(reported.ends_with(".syllabic.toml"), "reported: {reported}");
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".syllabic.toml"), "max_grade = 6.0\n").unwrap();
    fs::write(tmp.path().join("syllabic.toml"), "max_grade = 12.0\n").unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["max_grade"], 12.0);
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("docs").join("guides");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        tmp.path().join(".syllabic.toml"),
        "min_reading_ease = 55.0\n",
    )
    .unwrap();

    let config = config_json(&nested);
    assert_eq!(config["min_reading_ease"], 55.0);
}

#[test]
fn closer_config_takes_precedence() {
    let tmp = TempDir::new().unwrap();
    let child = tmp.path().join("project");
    fs::create_dir_all(&child).unwrap();
    fs::write(tmp.path().join(".syllabic.toml"), "max_grade = 6.0\n").unwrap();
    fs::write(child.join(".syllabic.toml"), "max_grade = 10.0\n").unwrap();

    let config = config_json(&child);
    assert_eq!(config["max_grade"], 10.0);
}

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let parent = tmp.path().join("parent");
    let repo = parent.join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(parent.join(".syllabic.toml"), "max_grade = 6.0\n").unwrap();

    let config = config_json(&src);
    assert!(config["max_grade"].is_null(), "search should stop at .git");
    assert!(config["config_file"].is_null());
}

#[test]
fn config_beside_git_is_found() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(repo.join(".syllabic.toml"), "max_grade = 7.0\n").unwrap();

    let config = config_json(&src);
    assert_eq!(config["max_grade"], 7.0);
}

// =============================================================================
// Formats
// =============================================================================

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".syllabic.yaml"),
        "log_level: warn\nmax_grade: 8\n",
    )
    .unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["log_level"], "warn");
    assert_eq!(config["max_grade"], 8.0);
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("syllabic.json"),
        r#"{"min_reading_ease": 40.5, "disable_input_limit": true}"#,
    )
    .unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["min_reading_ease"], 40.5);
    assert!(config["max_input_bytes"].is_null());
}

#[test]
fn later_extension_overrides_earlier_in_same_directory() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".syllabic.toml"), "max_grade = 6.0\n").unwrap();
    fs::write(tmp.path().join(".syllabic.yml"), "max_grade: 11\n").unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["max_grade"], 11.0);
}

#[test]
fn unknown_config_field_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".syllabic.toml"),
        "max_grade = 9.0\ntokenizer = \"none\"\n",
    )
    .unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["max_grade"], 9.0);
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".syllabic.toml"), "max_grade = 6.0\n").unwrap();
    let explicit = tmp.path().join("ci.toml");
    fs::write(&explicit, "max_grade = 14.0\n").unwrap();

    let output = cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--config",
            explicit.to_str().unwrap(),
            "info",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["max_grade"], 14.0);
    assert!(
        json["config"]["config_file"]
            .as_str()
            .unwrap()
            .ends_with("ci.toml")
    );
}

#[test]
fn environment_overrides_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".syllabic.toml"), "max_grade = 6.0\n").unwrap();

    let config = config_json_with_env(tmp.path(), &[("SYLLABIC_MAX_GRADE", "13")]);
    assert_eq!(config["max_grade"], 13.0);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".syllabic.toml"), "max_grade = [[[").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn wrong_type_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".syllabic.toml"),
        "max_grade = \"easy\"\n",
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn invalid_log_level_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".syllabic.toml"), "log_level = \"loud\"\n").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}
