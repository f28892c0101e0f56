use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn summary_reports_mesh_and_star_counts() {
    let mut cmd = Command::cargo_bin("terra").expect("binary exists");
    cmd.args(["--summary-only", "--stars", "250", "--seed", "7"]);
    cmd.assert()
        .success()
        .stdout(contains("Earth mesh: 2701 vertices, 15552 indices"))
        .stdout(contains("Star mesh: 703 vertices, 3888 indices"))
        .stdout(contains("Star field: 250 stars"));
}

#[test]
fn summary_uses_the_default_star_count() {
    let mut cmd = Command::cargo_bin("terra").expect("binary exists");
    cmd.arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Star field: 1000 stars"));
}

#[test]
fn unknown_argument_is_rejected_with_usage() {
    let mut cmd = Command::cargo_bin("terra").expect("binary exists");
    cmd.arg("--bogus");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --bogus"))
        .stderr(contains("Usage: terra"));
}

#[test]
fn flags_require_their_values() {
    let mut cmd = Command::cargo_bin("terra").expect("binary exists");
    cmd.arg("--stars");
    cmd.assert()
        .failure()
        .stderr(contains("--stars expects a value"));
}
