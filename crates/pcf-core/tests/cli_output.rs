//! Successful pcf-core runs: report, snapshot and template output.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pcf_core(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pcf-core").expect("pcf-core binary should exist");
    cmd.current_dir(dir.path()).env_remove("PCF_LOG").env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Template
// ============================================================================

#[test]
fn template_lists_every_key() {
    let dir = TempDir::new().unwrap();
    let assert = pcf_core(&dir).arg("--template").assert().success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for key in ["CATALOG_LABEL", "BOX_SIZE", "PAIR_COUNT", "CF_ESTIMATOR", "OVERWRITE"] {
        assert!(out.contains(key), "template misses {}", key);
    }
}

#[test]
fn template_ignores_invalid_parameters() {
    let dir = TempDir::new().unwrap();
    pcf_core(&dir)
        .args(["--template", "-O", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PAIR_COUNT"));
}

// ============================================================================
// Report
// ============================================================================

#[test]
fn report_printed_by_default() {
    let dir = TempDir::new().unwrap();
    pcf_core(&dir)
        .args(["-i", "data.txt,rand.txt", "-b", "1000", "-p", "AA,AB,BB"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CATALOG_LABEL"))
        .stdout(predicate::str::contains("'A' , 'B'"))
        .stdout(predicate::str::contains("k-d tree"));
}

#[test]
fn quiet_run_prints_nothing() {
    let dir = TempDir::new().unwrap();
    pcf_core(&dir)
        .args(["-l", "D", "-b", "1000", "-p", "DD", "-v", "F"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn file_and_command_line_merge() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("pcf_box.toml"),
        "CATALOG_LABEL = [\"D\", \"R\"]\nBOX_SIZE = 500.0\nPAIR_COUNT = [\"DD\"]\n",
    )
    .unwrap();
    pcf_core(&dir)
        .args(["-p", "DR,RR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DR"))
        .stdout(predicate::str::contains("500"));
}

#[test]
fn existing_pair_file_is_read_back() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("dd.dat"), "counts").unwrap();
    pcf_core(&dir)
        .args([
            "-l", "D,R", "-b", "100", "-p", "DD,DR", "-P", "dd.dat,dr.dat", "-O", "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("<R> dd.dat"))
        .stdout(predicate::str::contains("<W> dr.dat"));
}

#[test]
fn accepted_answer_overwrites() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cf.dat"), "old").unwrap();
    pcf_core(&dir)
        .args(["-l", "D", "-b", "100", "-p", "DD", "-e", "DD/DD", "-E", "cf.dat", "-O", "-1"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("cf.dat"));
}

// ============================================================================
// Snapshot
// ============================================================================

#[test]
fn snapshot_is_verifiable_json() {
    let dir = TempDir::new().unwrap();
    let assert = pcf_core(&dir)
        .args(["-l", "D", "-b", "1000", "-p", "DD", "-v", "0", "--emit-json"])
        .assert()
        .success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let snapshot = pcf_config::ConfigSnapshot::from_json(out.trim()).unwrap();
    assert!(snapshot.verify());
    assert_eq!(snapshot.config.box_size, [1000.0; 3]);
}

#[test]
fn jsonl_logs_go_to_stderr() {
    let dir = TempDir::new().unwrap();
    let assert = pcf_core(&dir)
        .args(["-l", "D", "-b", "1000", "-p", "DD", "-v", "0", "--log-format", "jsonl"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let err = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    let records: Vec<serde_json::Value> = err
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let missing = records
        .iter()
        .find(|r| r["event"] == "config.missing")
        .expect("missing configuration file should be logged");
    assert_eq!(missing["level"], "warn");
    assert_eq!(missing["stage"], "load");
    assert!(missing["run_id"].as_str().unwrap().starts_with("run-"));
}
