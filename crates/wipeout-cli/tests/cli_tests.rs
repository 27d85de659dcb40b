//! Integration tests for wipeout-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn wipeout_cmd() -> Command {
    cargo_bin_cmd!("wipeout")
}

fn write_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, vec![0x5a; size]).expect("failed to write fixture");
    path
}

#[test]
fn test_version_flag() {
    wipeout_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wipeout"));
}

#[test]
fn test_help_flag() {
    wipeout_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("shred"))
        .stdout(predicate::str::contains("plan"));
}

#[test]
fn test_shred_help() {
    wipeout_cmd()
        .args(["shred", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--passes"))
        .stdout(predicate::str::contains("--recursive"));
}

#[test]
fn test_shred_requires_path() {
    wipeout_cmd().arg("shred").assert().failure();
}

#[test]
fn test_shred_rejects_zero_passes() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_file(temp.path(), "a.bin", 16);

    wipeout_cmd()
        .args(["shred", "--force", "--passes", "0"])
        .arg(&file)
        .assert()
        .failure();
    assert!(file.exists());
}

#[test]
fn test_shred_force_removes_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_file(temp.path(), "secret.txt", 4096);

    wipeout_cmd()
        .args(["shred", "--force", "--level", "quick"])
        .arg(&file)
        .assert()
        .success();

    assert!(!file.exists());
}

#[test]
fn test_shred_directory_without_recursive_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let dir = temp.path().join("dir");
    fs::create_dir(&dir).unwrap();
    let inner = write_file(&dir, "kept.txt", 10);

    wipeout_cmd()
        .args(["shred", "--force"])
        .arg(&dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("-r"));

    assert!(inner.exists());
}

#[test]
fn test_shred_recursive_removes_tree() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = temp.path().join("project");
    fs::create_dir_all(root.join("nested/deeper")).unwrap();
    write_file(&root, "a.txt", 100);
    write_file(&root.join("nested"), "b.txt", 200);
    write_file(&root.join("nested/deeper"), "c.txt", 0);

    wipeout_cmd()
        .args(["shred", "--force", "-r", "-p", "2", "-j", "2"])
        .arg(&root)
        .assert()
        .success();

    assert!(!root.exists());
    assert!(temp.path().exists());
}

#[test]
fn test_shred_missing_file_is_failure() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let present = write_file(temp.path(), "present.txt", 8);

    wipeout_cmd()
        .args(["shred", "--force", "-p", "1"])
        .arg(temp.path().join("absent.txt"))
        .arg(&present)
        .assert()
        .code(1);

    // The missing path does not stop the rest of the batch.
    assert!(!present.exists());
}

#[test]
fn test_plan_leaves_files() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_file(temp.path(), "report.pdf", 2048);

    wipeout_cmd()
        .args(["plan", "--passes", "3"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("report.pdf"))
        .stdout(predicate::str::contains("6.0 KB to write"));

    assert!(file.exists());
}

#[test]
fn test_plan_json() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_file(temp.path(), "data.bin", 10);

    let output = wipeout_cmd()
        .args(["--json", "plan", "-l", "quick"])
        .arg(&file)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "plan");
    assert_eq!(json["data"]["total_files"], 1);
    assert_eq!(json["data"]["bytes_to_write"], 30);
    assert!(file.exists());
}

#[test]
fn test_json_requires_force() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_file(temp.path(), "a.txt", 10);

    let output = wipeout_cmd()
        .args(["--json", "shred"])
        .arg(&file)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json["error"].as_str().unwrap().contains("--force"));
    assert!(file.exists());
}

#[test]
fn test_shred_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_file(temp.path(), "a.txt", 10);

    let output = wipeout_cmd()
        .args(["--json", "shred", "--force", "-p", "2"])
        .arg(&file)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "shred");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["succeeded"], 1);
    assert_eq!(json["data"]["bytes_overwritten"], 20);
    assert_eq!(json["data"]["targets"][0]["passes_completed"], 2);
    assert!(!file.exists());
}

#[test]
fn test_prompt_declined_keeps_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_file(temp.path(), "keep.txt", 10);

    wipeout_cmd()
        .arg("shred")
        .arg(&file)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));

    assert!(file.exists());
}

#[test]
fn test_prompt_accepted_removes_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let file = write_file(temp.path(), "gone.txt", 10);

    wipeout_cmd()
        .args(["shred", "-p", "1"])
        .arg(&file)
        .write_stdin("yes\n")
        .assert()
        .success();

    assert!(!file.exists());
}

#[test]
fn test_completion_bash() {
    wipeout_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wipeout"));
}
