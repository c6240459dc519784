//! Configuration integration tests.
//!
//! Config discovery, format parsing, and precedence, checked end to end
//! through the compiled binary. `info --json` exposes the effective values;
//! `check` shows that they change behavior.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Run `info --json` from a directory and parse the JSON output.
fn info_json(dir: &Path) -> Value {
    let output = cmd()
        .args(["-C", dir.to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

/// A one-rule dictionary flagging 測試詞 as an error.
const TINY_DICTIONARY: &str = r#"{
  "version": "test-1",
  "lastUpdated": "2025-01-01",
  "rules": {
    "10000": {"level": "error", "message": "測試規則", "category": "general", "concepts": []}
  },
  "termToRulesMap": {
    "測試詞": [{"ruleId": "10000", "taiwanAlternatives": ["替代詞"]}]
  }
}"#;

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "info");
    assert!(json["config"]["config_file"].is_null());
    assert!(json["config"]["dictionary"].is_null());
    assert_eq!(json["config"]["max_input_bytes"], 5 * 1024 * 1024);
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".zhi-lang-cop.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "debug");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(
        reported.ends_with(".zhi-lang-cop.toml"),
        "should report dotfile: {reported}"
    );
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("docs").join("zh-tw");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join("zhi-lang-cop.toml"), r#"min_level = "warning""#).unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(json["config"]["min_level"], "warning");
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".zhi-lang-cop.toml"), r#"log_level = "debug""#).unwrap();
    fs::write(tmp.path().join("zhi-lang-cop.toml"), r#"log_level = "error""#).unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "error");
}

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let parent = tmp.path().join("parent");
    let src = parent.join("repo").join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(parent.join(".zhi-lang-cop.toml"), r#"log_level = "error""#).unwrap();
    fs::create_dir(parent.join("repo").join(".git")).unwrap();

    let json = info_json(&src);

    assert_eq!(json["config"]["log_level"], "info");
    assert!(json["config"]["config_file"].is_null());
}

// =============================================================================
// Config Format Parsing
// =============================================================================

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".zhi-lang-cop.yaml"),
        "min_level: info\nmax_input_bytes: 1024\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["min_level"], "info");
    assert_eq!(json["config"]["max_input_bytes"], 1024);
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".zhi-lang-cop.json"),
        r#"{"disable_input_limit": true}"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert!(json["config"]["max_input_bytes"].is_null());
}

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".zhi-lang-cop.toml"), r#"log_level = "debug""#).unwrap();
    let explicit = tmp.path().join("override.toml");
    fs::write(&explicit, r#"log_level = "error""#).unwrap();

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
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["log_level"], "error");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with("override.toml"), "{reported}");
}

#[test]
fn env_var_overrides_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".zhi-lang-cop.toml"), r#"min_level = "error""#).unwrap();

    let output = cmd()
        .env("ZHI_LANG_COP_MIN_LEVEL", "depends")
        .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["min_level"], "depends");
}

// =============================================================================
// Config Affects Behavior
// =============================================================================

#[test]
fn min_level_from_config_applies_to_check() {
    let tmp = TempDir::new().unwrap();

    // 性能 is a warning: clean at the default threshold.
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "check"])
        .write_stdin("提升性能")
        .assert()
        .success();

    fs::write(tmp.path().join(".zhi-lang-cop.toml"), r#"min_level = "warning""#).unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "check"])
        .write_stdin("提升性能")
        .assert()
        .failure()
        .stdout(predicate::str::contains("性能"));
}

#[test]
fn dictionary_from_config_replaces_bundled() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("tiny.json"), TINY_DICTIONARY).unwrap();
    fs::write(
        tmp.path().join(".zhi-lang-cop.toml"),
        r#"dictionary = "tiny.json""#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["dictionary"]["version"], "test-1");
    assert_eq!(json["dictionary"]["totalRules"], 1);

    // Bundled terms are no longer flagged; the custom one is.
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "check"])
        .write_stdin("優化數據庫")
        .assert()
        .success();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "check", "--format", "json"])
        .write_stdin("這是測試詞")
        .assert()
        .failure()
        .stdout(predicate::str::contains("替代詞"));
}

#[test]
fn input_limit_from_config_rejects_large_stdin() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".zhi-lang-cop.toml"), "max_input_bytes = 8\n").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "check"])
        .write_stdin("這段文字超過八個位元組")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".zhi-lang-cop.toml"),
        "this is not valid toml [[[",
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn invalid_min_level_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".zhi-lang-cop.toml"), r#"min_level = "severe""#).unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}

#[test]
fn missing_dictionary_file_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".zhi-lang-cop.toml"),
        r#"dictionary = "does-not-exist.json""#,
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.json"));
}
