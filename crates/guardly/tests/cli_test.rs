//! Integration tests for the `guardly` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live panel.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `guardly` binary with env isolation.
///
/// Clears all `GUARDLY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn guardly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("guardly");
    cmd.env("HOME", "/tmp/guardly-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/guardly-test-nonexistent")
        .env_remove("GUARDLY_PROFILE")
        .env_remove("GUARDLY_PANEL_URL")
        .env_remove("GUARDLY_TOKEN")
        .env_remove("GUARDLY_BILLING_URL")
        .env_remove("GUARDLY_OUTPUT")
        .env_remove("GUARDLY_INSECURE")
        .env_remove("GUARDLY_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = guardly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    guardly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("VPN panel")
            .and(predicate::str::contains("users"))
            .and(predicate::str::contains("system"))
            .and(predicate::str::contains("payments")),
    );
}

#[test]
fn test_version_flag() {
    guardly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("guardly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    guardly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    guardly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = guardly_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_users_list_no_config() {
    guardly_cmd().args(["users", "list"]).assert().failure().stderr(
        predicate::str::contains("config")
            .or(predicate::str::contains("Configuration"))
            .or(predicate::str::contains("panel-url"))
            .or(predicate::str::contains("profile")),
    );
}

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    guardly_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_prints_path() {
    guardly_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_invalid_output_format() {
    let output = guardly_cmd()
        .args(["--output", "invalid", "users", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing panel config, not about argument parsing.
    guardly_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "users",
            "list",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("panel-url"))
                .or(predicate::str::contains("profile")),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_users_subcommands_exist() {
    guardly_cmd().args(["users", "--help"]).assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("get"))
            .and(predicate::str::contains("create"))
            .and(predicate::str::contains("delete"))
            .and(predicate::str::contains("subscription")),
    );
}

#[test]
fn test_system_subcommands_exist() {
    guardly_cmd().args(["system", "--help"]).assert().success().stdout(
        predicate::str::contains("info")
            .and(predicate::str::contains("stats"))
            .and(predicate::str::contains("overview")),
    );
}

#[test]
fn test_payments_subcommands_exist() {
    guardly_cmd()
        .args(["payments", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("confirm")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    guardly_cmd().args(["config", "--help"]).assert().success().stdout(
        predicate::str::contains("init")
            .and(predicate::str::contains("show"))
            .and(predicate::str::contains("set-token")),
    );
}
