// Command line tests for the pyarch binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("shapes_pkg")
}

fn pyarch() -> Command {
    let mut cmd = Command::cargo_bin("pyarch").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_tree_is_default_format() {
    pyarch()
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Package roots: shapes\n"))
        .stdout(predicate::str::contains("class Square (bases: PrintableMixin, Base)"));
}

#[test]
fn test_json_format() {
    let output = pyarch()
        .arg(fixture())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["roots"], serde_json::json!(["shapes"]));
    assert!(value["modules"]["shapes.core"].is_object());
    assert!(value["edges"].as_array().unwrap().len() > 19);
}

#[test]
fn test_json_indent() {
    pyarch()
        .arg(fixture())
        .args(["--format", "json", "--indent", "4"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n    \"root_path\": "));
}

#[test]
fn test_mermaid_format() {
    pyarch()
        .arg(fixture())
        .args(["--format", "mermaid", "--detail-level", "none"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("classDiagram\n    direction TB\n"))
        .stdout(predicate::str::contains("    class Square\n"))
        .stdout(predicate::str::contains("+area()").not());
}

#[test]
fn test_invalid_detail_level() {
    pyarch()
        .arg(fixture())
        .args(["--format", "mermaid", "--detail-level", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bogus"));
}

#[test]
fn test_invalid_format() {
    pyarch()
        .arg(fixture())
        .args(["--format", "html"])
        .assert()
        .failure();
}

#[test]
fn test_missing_path_prints_empty_tree() {
    let dir = TempDir::new().unwrap();
    pyarch()
        .arg(dir.path().join("missing"))
        .assert()
        .success()
        .stdout("Package roots: \n\n");
}

#[test]
fn test_skipped_file_is_warned() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ok.py"), "def ok():\n    pass\n").unwrap();
    fs::write(dir.path().join("broken.py"), "class (:\n").unwrap();

    pyarch()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("def ok()"))
        .stderr(predicate::str::contains("broken.py"));
}

#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pyarch.toml");
    fs::write(&config, "[output]\nformat = \"mermaid\"\n\n[diagram]\ndirection = \"LR\"\n").unwrap();

    pyarch()
        .arg(fixture())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("classDiagram\n    direction LR\n"));
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pyarch.toml");
    fs::write(&config, "[output]\nformat = \"mermaid\"\n").unwrap();

    pyarch()
        .arg(fixture())
        .arg("--config")
        .arg(&config)
        .args(["--format", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Package roots: shapes"));
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("pyarch.toml");
    fs::write(&config, "[diagram]\ndirection = \"sideways\"\n").unwrap();

    pyarch()
        .arg(fixture())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("direction"));
}
