//! Integration tests for the `avail` CLI binary.
//!
//! Exercise the query and validate subcommands through the actual binary
//! against fixture snapshots, with `--now` pinned so output is reproducible.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn snapshot_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/snapshot.json")
}

fn broken_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/broken.json")
}

/// Monday 2026-03-02 09:00 in Sao Paulo, so a [0,0] window hits the
/// fixture's Monday work range.
const NOW: &str = "2026-03-02T12:00:00Z";

// ─────────────────────────────────────────────────────────────────────────────
// Query subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn query_prints_availability_json() {
    Command::cargo_bin("avail")
        .unwrap()
        .args([
            "query",
            "-i",
            snapshot_path(),
            "--company",
            "acme",
            "--service",
            "svc-1",
            "--timezone",
            "America/Sao_Paulo",
            "--from",
            "0",
            "--to",
            "0",
            "--now",
            NOW,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"service_id\": \"svc-1\""))
        .stdout(predicate::str::contains("\"date\": \"2026-03-02\""))
        // 09:30 is booked in the fixture; 09:00 survives.
        .stdout(predicate::str::contains("\"time\": \"09:00\""))
        .stdout(predicate::str::contains("\"time\": \"09:30\"").not());
}

#[test]
fn query_surfaces_client_booking_as_occupied() {
    Command::cargo_bin("avail")
        .unwrap()
        .args([
            "query",
            "-i",
            snapshot_path(),
            "--company",
            "acme",
            "--service",
            "svc-1",
            "--timezone",
            "America/Sao_Paulo",
            "--from",
            "0",
            "--to",
            "0",
            "--client",
            "cli-9",
            "--now",
            NOW,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"occupied_by_client\": true"))
        .stdout(predicate::str::contains("\"time\": \"09:30\""));
}

#[test]
fn query_unknown_company_fails() {
    Command::cargo_bin("avail")
        .unwrap()
        .args([
            "query",
            "-i",
            snapshot_path(),
            "--company",
            "ghost",
            "--service",
            "svc-1",
            "--timezone",
            "UTC",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Company 'ghost' not found"));
}

#[test]
fn query_unknown_service_fails() {
    Command::cargo_bin("avail")
        .unwrap()
        .args([
            "query",
            "-i",
            snapshot_path(),
            "--company",
            "acme",
            "--service",
            "svc-ghost",
            "--timezone",
            "UTC",
            "--now",
            NOW,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to compute availability"));
}

#[test]
fn query_missing_file_fails() {
    Command::cargo_bin("avail")
        .unwrap()
        .args([
            "query",
            "-i",
            "/nonexistent/snapshot.json",
            "--company",
            "acme",
            "--service",
            "svc-1",
            "--timezone",
            "UTC",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Validate subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_clean_snapshot_succeeds() {
    Command::cargo_bin("avail")
        .unwrap()
        .args(["validate", "-i", snapshot_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("All work ranges valid"));
}

#[test]
fn validate_reports_midnight_straddling_range() {
    Command::cargo_bin("avail")
        .unwrap()
        .args(["validate", "-i", broken_path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wr-night"))
        .stderr(predicate::str::contains("1 invalid work range(s)"));
}
