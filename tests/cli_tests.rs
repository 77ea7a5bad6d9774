//! CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::assert::Assert;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

use drawbrain::testkit::config::config_toml;

fn drawbrain() -> Command {
    let mut cmd = cargo_bin_cmd!("drawbrain");
    cmd.env_remove("DRAWBRAIN_DATABASE");
    cmd
}

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("drawbrain.toml");
    fs::write(&path, config_toml(&dir.join("engine.db"))).expect("write temp config");
    path
}

fn run_draw(config: &Path, date: &str, primary: &str, secondary: &str) -> Assert {
    drawbrain()
        .arg("--config")
        .arg(config)
        .args([
            "run",
            "--draw-date",
            date,
            "--primary",
            primary,
            "--secondary",
            secondary,
        ])
        .assert()
}

fn json_stdout(assert: &Assert) -> Value {
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    serde_json::from_str(stdout.trim()).expect("stdout is one JSON document")
}

#[test]
fn test_help() {
    drawbrain()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("drawbrain"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("performance"));
}

#[test]
fn test_strategies_list() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    drawbrain()
        .arg("--config")
        .arg(&config)
        .arg("strategies")
        .assert()
        .success()
        .stdout(predicate::str::contains("frequency"))
        .stdout(predicate::str::contains("gap"))
        .stdout(predicate::str::contains("momentum"))
        .stdout(predicate::str::contains("balanced"))
        .stdout(predicate::str::contains("random"));
}

#[test]
fn run_then_query_tickets_and_performance() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    run_draw(&config, "2026-10-17", "4,8,15,16,23", "7")
        .success()
        .stdout(predicate::str::contains("Outcome 2026-10-17"))
        .stdout(predicate::str::contains("2026-10-19"));

    let tickets = drawbrain()
        .arg("--config")
        .arg(&config)
        .args(["tickets", "--json"])
        .assert()
        .success();
    let doc = json_stdout(&tickets);
    assert_eq!(doc["command"], "tickets");
    assert_eq!(doc["target"], "2026-10-19");
    assert_eq!(doc["tickets"].as_array().map(Vec::len), Some(12));

    let limited = drawbrain()
        .arg("--config")
        .arg(&config)
        .args(["tickets", "--json", "--limit", "3"])
        .assert()
        .success();
    assert_eq!(
        json_stdout(&limited)["tickets"].as_array().map(Vec::len),
        Some(3)
    );

    let performance = drawbrain()
        .arg("--config")
        .arg(&config)
        .args(["performance", "--json"])
        .assert()
        .success();
    let doc = json_stdout(&performance);
    let strategies = doc["strategies"].as_array().expect("strategies array");
    assert_eq!(strategies.len(), 5);
    let sum: f64 = strategies
        .iter()
        .filter_map(|s| s["weight"].as_f64())
        .sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

#[test]
fn second_draw_reports_evaluation_in_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    run_draw(&config, "2026-10-17", "4,8,15,16,23", "7").success();
    let second = drawbrain()
        .arg("--config")
        .arg(&config)
        .args([
            "--json",
            "run",
            "--draw-date",
            "2026-10-19",
            "--primary",
            "1,2,3,4,5",
            "--secondary",
            "9",
        ])
        .assert()
        .success();

    let doc = json_stdout(&second);
    assert_eq!(doc["command"], "run");
    assert_eq!(doc["run"]["result"], "completed");
    assert_eq!(doc["run"]["evaluated"], 12);
    assert_eq!(doc["run"]["target"], "2026-10-21");
}

#[test]
fn repeated_draw_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    run_draw(&config, "2026-10-17", "4,8,15,16,23", "7").success();
    run_draw(&config, "2026-10-17", "4,8,15,16,23", "7")
        .success()
        .stdout(predicate::str::contains("already processed"));
}

#[test]
fn sync_reads_outcome_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let source = dir.path().join("outcomes.json");
    fs::write(
        &source,
        r#"[
            {"draw_date": "2026-10-19", "primary_numbers": [3, 9, 27, 41, 60], "secondary_number": 12},
            {"draw_date": "2026-10-17", "primary_numbers": [4, 8, 15, 16, 23], "secondary_number": 7}
        ]"#,
    )
    .unwrap();

    drawbrain()
        .arg("--config")
        .arg(&config)
        .arg("sync")
        .arg("--source")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 outcome(s)"));

    drawbrain()
        .arg("--config")
        .arg(&config)
        .arg("sync")
        .arg("--source")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date"));
}

#[test]
fn invalid_draw_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    run_draw(&config, "2026-10-17", "4,8,15,16,99", "7")
        .failure()
        .code(1);
}

#[test]
fn cli_returns_nonzero_on_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[engine]\nlearning_rate = 1.5\n").unwrap();

    drawbrain()
        .arg("--config")
        .arg(&path)
        .arg("strategies")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("learning_rate"));
}

#[test]
fn conflicting_draw_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    run_draw(&config, "2026-10-17", "4,8,15,16,23", "7").success();
    run_draw(&config, "2026-10-17", "1,2,3,4,5", "9")
        .failure()
        .code(1)
        .stderr(predicate::str::contains("different numbers"));
}
