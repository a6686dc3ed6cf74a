//! Integration tests for the `fwctl` binary.
//!
//! Everything here runs without a live backend: login is served by the
//! built-in authenticator and sessions land in a per-test data directory.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Nothing listens on the discard port, so any real request fails fast.
const DEAD_SERVER: &str = "http://127.0.0.1:9";

/// Build a [`Command`] for the `fwctl` binary with env isolation.
///
/// Clears all `FWCTL_*` env vars and points config/data directories at
/// `home` so tests never touch the user's real configuration or session.
fn fwctl_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fwctl");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("FWCTL_PROFILE")
        .env_remove("FWCTL_SERVER")
        .env_remove("FWCTL_OUTPUT")
        .env_remove("FWCTL_INSECURE")
        .env_remove("FWCTL_TIMEOUT")
        .env_remove("FWCTL_USERNAME")
        .env_remove("FWCTL_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn login(home: &Path, password: &str) -> std::process::Output {
    fwctl_cmd(home)
        .args(["--server", DEAD_SERVER, "login", "--username", "admin", "--password-stdin"])
        .write_stdin(format!("{password}\n"))
        .output()
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = fwctl_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    fwctl_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("SecureFingerprint")
            .and(predicate::str::contains("logs"))
            .and(predicate::str::contains("rules"))
            .and(predicate::str::contains("users")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    fwctl_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    fwctl_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fwctl"));
}

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    let output = fwctl_cmd(home.path()).arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let output = fwctl_cmd(home.path())
        .args(["--output", "xml", "whoami"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_points_into_config_home() {
    let home = TempDir::new().unwrap();
    fwctl_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_use_unknown_profile_is_not_found() {
    let home = TempDir::new().unwrap();
    let output = fwctl_cmd(home.path())
        .args(["config", "use", "staging"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("staging"));
}

#[test]
fn test_backend_command_without_server_reports_missing_config() {
    let home = TempDir::new().unwrap();
    let output = fwctl_cmd(home.path()).arg("whoami").output().unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("fwctl config init"));
}

// ── Session lifecycle ───────────────────────────────────────────────

#[test]
fn test_whoami_requires_login() {
    let home = TempDir::new().unwrap();
    let output = fwctl_cmd(home.path())
        .args(["--server", DEAD_SERVER, "whoami"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_login_persists_across_invocations() {
    let home = TempDir::new().unwrap();
    let output = login(home.path(), "admin123");
    assert!(output.status.success(), "{}", combined_output(&output));

    fwctl_cmd(home.path())
        .args(["--server", DEAD_SERVER, "--output", "json", "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"username\": \"admin\""));

    fwctl_cmd(home.path())
        .args(["--server", DEAD_SERVER, "logout"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged out"));

    let output = fwctl_cmd(home.path())
        .args(["--server", DEAD_SERVER, "whoami"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_wrong_password_fails_with_auth_code() {
    let home = TempDir::new().unwrap();
    let output = login(home.path(), "not-the-password");
    assert_eq!(output.status.code(), Some(3));
    assert!(!home.path().join("data").join("fwctl").join("session.json").exists());
}

#[test]
fn test_resource_commands_require_login() {
    let home = TempDir::new().unwrap();
    let output = fwctl_cmd(home.path())
        .args(["--server", DEAD_SERVER, "logs", "recent"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_unreachable_backend_maps_to_connection_code() {
    let home = TempDir::new().unwrap();
    assert!(login(home.path(), "admin123").status.success());

    let output = fwctl_cmd(home.path())
        .args(["--server", DEAD_SERVER, "--timeout", "5", "rules", "bans"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[test]
fn test_backend_failure_is_shown_once() {
    let home = TempDir::new().unwrap();
    assert!(login(home.path(), "admin123").status.success());

    let output = fwctl_cmd(home.path())
        .args(["--server", DEAD_SERVER, "--timeout", "5", "rules", "stats"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("network connection timeout").count(),
        1,
        "message should appear exactly once:\n{stderr}"
    );
    assert!(stderr.contains("Check that the backend is running"), "{stderr}");
}

// ── Command tree ────────────────────────────────────────────────────

#[test]
fn test_subcommands_exist() {
    let home = TempDir::new().unwrap();
    for (group, subs) in [
        ("logs", &["list", "recent", "stats", "user", "search", "export", "cleanup"][..]),
        ("rules", &["bans", "ban", "unban", "whitelist", "allow", "disallow", "analysis"][..]),
        ("users", &["list", "show", "score", "reset-score", "adjust-score", "low", "stats"][..]),
        ("settings", &["show", "update", "reset", "export", "import", "history"][..]),
        ("config", &["init", "show", "path", "profiles", "use"][..]),
    ] {
        let output = fwctl_cmd(home.path()).args([group, "--help"]).output().unwrap();
        let text = combined_output(&output);
        for sub in subs {
            assert!(text.contains(sub), "`{group} --help` is missing `{sub}`:\n{text}");
        }
    }
}
