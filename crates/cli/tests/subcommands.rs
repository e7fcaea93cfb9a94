use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn cli(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dynamic-rules").expect("binary");
    cmd.env("DYNAMIC_RULES_CONFIG", config_path(config_dir))
        .env_remove("MCP_REQUIRE_GITHUB_CONSENT")
        .env_remove("GITHUB_PUSH_ALLOWED")
        .env_remove("RUST_LOG");
    cmd
}

fn config_path(config_dir: &TempDir) -> std::path::PathBuf {
    config_dir.path().join("config.json")
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn write_lines(path: &Path, count: usize) {
    let body = (0..count)
        .map(|i| format!("const line{i} = {i};"))
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(path, body).unwrap();
}

#[test]
fn config_set_persists_and_show_reads_back() {
    let dir = tempfile::tempdir().unwrap();

    cli(&dir)
        .args(["config", "set", "fileSizeLimit.warning", "650"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fileSizeLimit.warning updated"));
    assert!(config_path(&dir).exists());

    let body = json_stdout(cli(&dir).args(["config", "show", "fileSizeLimit.warning", "--json"]));
    assert_eq!(body["data"]["value"], 650);

    cli(&dir)
        .args(["config", "set", "fileSizeLimit.hard", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid preferences"));

    cli(&dir).args(["config", "reset"]).assert().success();
    let body = json_stdout(cli(&dir).args(["config", "show", "--json"]));
    assert_eq!(body["data"]["fileSizeLimit"]["warning"], 700);
}

#[test]
fn config_path_honors_override() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
}

#[test]
fn classify_measures_target_files_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let big = dir.path().join("Dashboard.tsx");
    write_lines(&big, 1200);
    let target = big.display().to_string();

    let body = json_stdout(cli(&dir).args(["classify", "add a button", "-t", &target, "--json"]));
    assert_eq!(body["data"]["selectedRuleSet"], "SET_001");

    let body = json_stdout(cli(&dir).args([
        "classify",
        "add a button",
        "-t",
        &target,
        "--check-sizes",
        "--json",
    ]));
    assert_eq!(body["data"]["selectedRuleSet"], "SET_005");
    assert_eq!(body["data"]["contextAnalysis"]["fileSizeStatus"], "violation");
}

#[test]
fn classify_prints_localized_report() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["classify", "explain the architecture of the renderer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SET_003"));
}

#[test]
fn refactor_measures_the_file_when_size_is_omitted() {
    let dir = tempfile::tempdir().unwrap();
    let app = dir.path().join("App.tsx");
    write_lines(&app, 1000);

    let body = json_stdout(cli(&dir).args([
        "refactor",
        app.to_str().unwrap(),
        "--violation",
        "File exceeds 1000 lines",
        "--json",
    ]));
    assert_eq!(body["data"]["currentSize"], 1000);
    assert_eq!(body["data"]["recommendedStrategy"], "hook-extraction");
    assert!(body["report"]
        .as_str()
        .unwrap()
        .contains("File exceeds 1000 lines"));
}

#[test]
fn check_size_flags_violations() {
    let dir = tempfile::tempdir().unwrap();
    let body = json_stdout(cli(&dir).args([
        "check-size",
        "--content",
        "one\ntwo",
        "--warning",
        "1",
        "--hard",
        "2",
        "--json",
    ]));
    assert_eq!(body["data"]["status"], "violation");
    assert!(body["data"]["requiredAction"]
        .as_str()
        .unwrap()
        .starts_with("MANDATORY REFACTORING"));

    cli(&dir)
        .args(["check-size", "/definitely/not/here.rs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn gates_report_status() {
    let dir = tempfile::tempdir().unwrap();
    let body = json_stdout(cli(&dir).args(["gates", "post", "--json"]));
    assert_eq!(body["data"]["status"], "passed");

    let body = json_stdout(cli(&dir).args(["gates", "during", "--lines-added", "250", "--json"]));
    assert_eq!(body["data"]["status"], "passed");
    assert_eq!(body["data"]["warnings"].as_array().unwrap().len(), 1);

    cli(&dir)
        .args(["gates", "review"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown quality gate stage: review"));
}

#[test]
fn rule_set_list_and_auto() {
    let dir = tempfile::tempdir().unwrap();
    let body = json_stdout(cli(&dir).args(["rule-set", "--list", "--json"]));
    let sets = body["data"].as_array().unwrap();
    assert_eq!(sets.len(), 5);
    assert_eq!(sets[0]["id"], "SET_001");

    let body = json_stdout(cli(&dir).args(["rule-set", "--complexity", "complex", "--json"]));
    assert_eq!(body["data"]["ruleSetId"], "SET_002");
    assert_eq!(body["data"]["isLoaded"], true);
}

#[test]
fn guide_language_flag_overrides_preferences() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir)
        .args(["guide", "closures", "--complexity", "simple", "--language", "en"])
        .assert()
        .success()
        .stdout(predicate::str::contains("This is a simple closures topic"));
}

#[test]
fn gatekeeper_exit_code_tracks_consent() {
    let dir = tempfile::tempdir().unwrap();
    cli(&dir).arg("gatekeeper").assert().success();

    cli(&dir)
        .env("MCP_REQUIRE_GITHUB_CONSENT", "true")
        .arg("gatekeeper")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("İŞLEM DURDURULDU"));

    cli(&dir)
        .env("MCP_REQUIRE_GITHUB_CONSENT", "1")
        .env("GITHUB_PUSH_ALLOWED", "1")
        .arg("gatekeeper")
        .assert()
        .success();
}
