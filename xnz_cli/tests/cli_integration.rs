use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &Path, toml: &str) -> PathBuf {
    let path = dir.join("xnz.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn write_trace(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("trace.csv");
    let mut f = fs::File::create(&path).unwrap();
    for row in rows {
        writeln!(f, "{row}").unwrap();
    }
    path
}

const VALID: &str = r#"
[calibration]
idle = 0.28
climb = 0.52
flex = 0.72
deadband = 0.04

[throttle]
idle_hold_ticks = 3
"#;

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["self-check"], 0, "generic", "stdout")]
#[case(&["curve", "--variant", "toliss", "--steps", "10"], 0, "# toliss", "stdout")]
#[case(&["curve", "--variant", "concorde"], 1, "unknown curve variant", "stderr")]
#[case(&["curve", "--steps", "0"], 2, "steps", "stderr")]
#[case(&["simulate"], 2, "--trace", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), VALID);

    let mut cmd = Command::cargo_bin("xnz").unwrap();
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
#[case("generic")]
#[case("nl-rev")]
#[case("w-rev")]
#[case("ddcl30")]
#[case("toliss")]
fn every_curve_variant_sweeps(#[case] variant: &str) {
    let out = Command::cargo_bin("xnz")
        .unwrap()
        .args(["curve", "--variant", variant, "--steps", "20"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    // header plus 21 points
    assert_eq!(stdout.lines().count(), 22);
    assert!(stdout.lines().nth(1).unwrap().contains("-1.0000"));
}

#[test]
fn invalid_config_exits_with_config_code() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "[calibration]\ndeadband = 0.0\n");

    Command::cargo_bin("xnz")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("What happened"));
}

#[test]
fn missing_config_file_is_a_config_error() {
    Command::cargo_bin("xnz")
        .unwrap()
        .args(["--config", "/definitely/not/here.toml", "self-check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration could not be used"));
}

#[test]
fn simulate_reports_writes_and_idle_hold() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), VALID);
    let trace = write_trace(
        dir.path(),
        &["left,right", "0.72,0.72", "0.72,0.72", "0.72,0.72", "0.72,0.72", "0.72,0.72"],
    );

    Command::cargo_bin("xnz")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["simulate", "--aircraft", "laminar", "--trace"])
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("written"))
        .stdout(predicate::str::contains("profile=generic ticks=5 writes=3 toggles=0 skipped=2"));
}

#[test]
fn simulate_rejects_bad_trace_headers() {
    let dir = tempdir().unwrap();
    let trace = write_trace(dir.path(), &["l,r", "0.5,0.5"]);

    Command::cargo_bin("xnz")
        .unwrap()
        .args(["simulate", "--trace"])
        .arg(&trace)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid headers in lever trace CSV"));
}

#[test]
fn simulate_rejects_unknown_aircraft() {
    let dir = tempdir().unwrap();
    let trace = write_trace(dir.path(), &["left,right", "0.5,0.5"]);

    Command::cargo_bin("xnz")
        .unwrap()
        .args(["simulate", "--aircraft", "concorde", "--trace"])
        .arg(&trace)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown aircraft preset 'concorde'"));
}

#[test]
fn calibration_csv_moves_the_detents() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("detents.csv");
    fs::write(&csv, "detent,raw\nidle,0.80\nclimb,0.50\nflex,0.30\n").unwrap();

    let out = Command::cargo_bin("xnz")
        .unwrap()
        .arg("--calibration")
        .arg(&csv)
        .args(["--json", "curve", "--steps", "100"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let row: serde_json::Value = serde_json::from_str(stdout.lines().nth(20).unwrap()).unwrap();
    // idle moved to 0.20, so x = 0.20 sits in the idle gap
    assert!(row["zone"].is_null());
    assert_eq!(row["y"], 0.0);
}

#[test]
fn cli_reports_bad_calibration_header() {
    let dir = tempdir().unwrap();
    let bad_csv = dir.path().join("calib.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "raw,value").unwrap();
    writeln!(f, "0.7,idle").unwrap();

    Command::cargo_bin("xnz")
        .unwrap()
        .arg("--calibration")
        .arg(&bad_csv)
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("detent"));
}
