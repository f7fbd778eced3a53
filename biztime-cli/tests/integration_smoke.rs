//! Smoke tests for the biztime binary

use assert_cmd::Command;
use predicates::prelude::*;

/// Binary isolated from the caller's environment and any local config/.env.
fn biztime(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("biztime").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("DATABASE_URL")
        .env_remove("BIZTIME_BIND")
        .env_remove("RUST_LOG");
    cmd
}

// === Help Output ===

#[test]
fn test_top_level_help() {
    let dir = tempfile::tempdir().unwrap();
    biztime(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_serve_help() {
    let dir = tempfile::tempdir().unwrap();
    biztime(&dir)
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-migrations"))
        .stdout(predicate::str::contains("Address to bind to"));
}

#[test]
fn test_migrate_help() {
    let dir = tempfile::tempdir().unwrap();
    biztime(&dir)
        .args(["migrate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--database-url"));
}

// === Config Command ===

#[test]
fn test_config_show_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("biztime.toml");
    std::fs::write(&path, "").unwrap();

    biztime(&dir)
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("bind = \"127.0.0.1:3000\""))
        .stdout(predicate::str::contains("max_connections = 5"));
}

#[test]
fn test_config_show_env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("biztime.toml");
    std::fs::write(&path, "[server]\nbind = \"127.0.0.1:9000\"\n").unwrap();

    biztime(&dir)
        .args(["config", "show", "--config"])
        .arg(&path)
        .env("BIZTIME_BIND", "127.0.0.1:9100")
        .assert()
        .success()
        .stdout(predicate::str::contains("127.0.0.1:9100"));
}

#[test]
fn test_config_missing_explicit_file() {
    let dir = tempfile::tempdir().unwrap();

    biztime(&dir)
        .args(["config", "show", "--config", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

// === Serve / Migrate without a database ===

#[test]
fn test_serve_requires_database_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("biztime.toml");
    std::fs::write(&path, "").unwrap();

    biztime(&dir)
        .args(["serve", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_migrate_requires_database_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("biztime.toml");
    std::fs::write(&path, "").unwrap();

    biztime(&dir)
        .args(["migrate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

// === Completions ===

#[test]
fn test_bash_completions() {
    let dir = tempfile::tempdir().unwrap();
    biztime(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("biztime"));
}
