//! CLI end-to-end tests
//!
//! Tests for the gallery-util command-line interface. Everything here runs
//! offline: `--dry-run` and `validate` never reach D1 or object storage.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the gallery-util binary, isolated from any local
/// config files and credentials.
#[allow(deprecated)]
fn gallery_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gallery-util").unwrap();
    cmd.current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("CLOUDFLARE_ACCOUNT_ID")
        .env_remove("CLOUDFLARE_D1_ID")
        .env_remove("CLOUDFLARE_D1_TOKEN")
        .env_remove("S3_BUCKET_NAME");
    cmd
}

fn photo_dir(count: usize) -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    for i in 0..count {
        fs::write(dir.path().join(format!("img{:02}.jpg", i)), b"not decoded").unwrap();
    }
    fs::write(dir.path().join("readme.txt"), b"skip me").unwrap();
    dir
}

#[test]
fn test_cli_no_args_shows_help() {
    let dir = tempdir().unwrap();
    gallery_cmd(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let dir = tempdir().unwrap();
    gallery_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("gallery-util"))
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("init-db"));
}

#[test]
fn test_cli_version_flag() {
    let dir = tempdir().unwrap();
    gallery_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_process_dry_run_prints_batched_plan() {
    let photos = photo_dir(25);
    let cwd = tempdir().unwrap();

    let output = gallery_cmd(cwd.path())
        .args(["process", "--dry-run"])
        .arg(photos.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("INSERT INTO photo ("))
        .stdout(predicate::str::contains("ON CONFLICT DO NOTHING;"))
        .stdout(predicate::str::contains("readme.txt").not())
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    // 9 columns under the default limit of 100 gives 11 rows per statement
    assert_eq!(stdout.matches("INSERT INTO photo (").count(), 3);
    assert!(stdout.contains("-- statement 3 (27 params)"));

    // Dry run leaves the source untouched
    assert!(!photos.path().join("thumbnails").exists());
}

#[test]
fn test_process_dry_run_with_collections() {
    let photos = photo_dir(2);
    let cwd = tempdir().unwrap();

    gallery_cmd(cwd.path())
        .args(["process", "--dry-run", "-C", "Film; Lisbon"])
        .arg(photos.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("INSERT INTO collection ("))
        .stdout(predicate::str::contains("INSERT INTO photo_collection"))
        .stdout(predicate::str::contains("\"Lisbon\""));
}

#[test]
fn test_process_respects_param_limit_from_config() {
    let photos = photo_dir(5);
    let cwd = tempdir().unwrap();
    fs::write(cwd.path().join("gallery.toml"), "[batch]\nparam_limit = 18\n").unwrap();

    let output = gallery_cmd(cwd.path())
        .args(["process", "--dry-run"])
        .arg(photos.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    // Two rows per statement: 2, 2, 1
    assert_eq!(stdout.matches("INSERT INTO photo (").count(), 3);
}

#[test]
fn test_process_param_limit_too_small() {
    let photos = photo_dir(1);
    let cwd = tempdir().unwrap();
    fs::write(cwd.path().join("gallery.toml"), "[batch]\nparam_limit = 4\n").unwrap();

    gallery_cmd(cwd.path())
        .args(["process", "--dry-run"])
        .arg(photos.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("param_limit"));
}

#[test]
fn test_process_missing_source() {
    let cwd = tempdir().unwrap();
    gallery_cmd(cwd.path())
        .args(["process", "--dry-run", "/nonexistent/photos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_init_db_dry_run() {
    let cwd = tempdir().unwrap();
    gallery_cmd(cwd.path())
        .args(["init-db", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS photo"))
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS photo_collection"));
}

#[test]
fn test_init_db_requires_credentials() {
    let cwd = tempdir().unwrap();
    gallery_cmd(cwd.path())
        .arg("init-db")
        .assert()
        .failure()
        .stderr(predicate::str::contains("d1.account_id"));
}

#[test]
fn test_validate_config_file() {
    let cwd = tempdir().unwrap();
    let config = cwd.path().join("gallery.toml");
    fs::write(
        &config,
        "[thumbnail]\nwidth = 10\nquality = 150\n\n[storage]\nbucket = \"photos\"\n",
    )
    .unwrap();

    gallery_cmd(cwd.path())
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("width 64, quality 100"))
        .stdout(predicate::str::contains("Bucket: photos"));
}

#[test]
fn test_validate_reports_credentials_from_environment() {
    let cwd = tempdir().unwrap();

    gallery_cmd(cwd.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("D1 credentials: missing"));

    gallery_cmd(cwd.path())
        .arg("validate")
        .env("CLOUDFLARE_ACCOUNT_ID", "acct")
        .env("CLOUDFLARE_D1_ID", "db")
        .env("CLOUDFLARE_D1_TOKEN", "token")
        .env("S3_BUCKET_NAME", "photos")
        .assert()
        .success()
        .stdout(predicate::str::contains("D1 credentials: configured"))
        .stdout(predicate::str::contains("Bucket: photos"));
}

#[test]
fn test_validate_invalid_toml() {
    let cwd = tempdir().unwrap();
    let config = cwd.path().join("broken.toml");
    fs::write(&config, "[thumbnail\nwidth = ").unwrap();

    gallery_cmd(cwd.path())
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}
