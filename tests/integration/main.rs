//! Integration tests for Stemma
//!
//! These tests drive the built binary against script and config files.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn stemma(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stemma"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute stemma")
}

fn write(dir: &TempDir, name: &str, contents: &str) {
    std::fs::write(dir.path().join(name), contents).unwrap();
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let output = stemma(&["--help"], dir.path());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Replay genealogy scripts against a transactional DAG"));
}

#[test]
fn test_run_prints_tree() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "outbreak.txt",
        "stem S\ncreate A S\ncreate B S\ncreate C A B\nremove A\n",
    );

    let output = stemma(&["run", "outbreak.txt"], dir.path());
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "S\n  B\n    C\n");
}

#[test]
fn test_run_prints_json() {
    let dir = TempDir::new().unwrap();
    write(&dir, "outbreak.txt", "stem S\ncreate A S\ncreate B A\n");

    let output = stemma(&["run", "outbreak.txt", "--json"], dir.path());
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["stem"], "S");
    assert_eq!(snapshot["entities"][0]["id"], "A");
    assert_eq!(snapshot["entities"][0]["children"][0], "B");
    assert_eq!(snapshot["entities"][1]["parents"][0], "A");
}

#[test]
fn test_run_fails_on_bad_line() {
    let dir = TempDir::new().unwrap();
    write(&dir, "outbreak.txt", "stem S\ncreate A S\nremove S\n");

    let output = stemma(&["run", "outbreak.txt"], dir.path());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("line 3"));
    assert!(stderr.contains("is the stem and cannot be removed"));
}

#[test]
fn test_run_keep_going_reports_and_continues() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "outbreak.txt",
        "stem S\ncreate A missing\ncreate A S\nconnect S A\n",
    );

    let output = stemma(&["run", "outbreak.txt", "--keep-going"], dir.path());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success());
    assert!(stderr.contains(r#"line 2: entity "missing" not found"#));
    assert!(stderr.contains("line 4: linking"));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "S\n  A\n");
}

#[test]
fn test_config_file_selects_policies() {
    let dir = TempDir::new().unwrap();
    write(&dir, "outbreak.txt", "stem S\ncreate A S\ncreate B A\nconnect A B\n");

    let output = stemma(&["run", "outbreak.txt"], dir.path());
    assert!(!output.status.success());

    write(&dir, "stemma.toml", "[genealogy]\nlink_policy = \"trust\"\n");
    let output = stemma(&["--config", "stemma.toml", "run", "outbreak.txt"], dir.path());
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "S\n  A\n    B\n      A (cycle)\n"
    );
}

#[test]
fn test_missing_script_is_reported() {
    let dir = TempDir::new().unwrap();
    let output = stemma(&["run", "absent.txt"], dir.path());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Failed to read script absent.txt"));
}
