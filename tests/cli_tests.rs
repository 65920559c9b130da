//! Exit-code behaviour of the seedkeeper binary

use httpmock::prelude::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Run the binary from `cwd` with a clean environment so no stray
/// `SEEDKEEPER_*` variable, `.env` or `Config` file leaks in.
fn seedkeeper(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seedkeeper"))
        .current_dir(cwd)
        .env_clear()
        .env("LOG_FILE_PATH", cwd.join("seedkeeper.log"))
        .envs(envs.iter().copied())
        .args(args)
        .output()
        .expect("Failed to execute seedkeeper")
}

#[test]
fn test_help_exits_zero() {
    let tmp = tempdir().unwrap();
    let output = seedkeeper(tmp.path(), &["--help"], &[]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--replace"));
    assert!(stdout.contains("--force"));
}

#[test]
fn test_invalid_amount_exits_one() {
    let tmp = tempdir().unwrap();
    let output = seedkeeper(tmp.path(), &[".", "--replace", "abc"], &[]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_amount_exits_one() {
    let tmp = tempdir().unwrap();
    let output = seedkeeper(tmp.path(), &[".", "--replace"], &[]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_no_directory_exits_one() {
    let tmp = tempdir().unwrap();
    let output = seedkeeper(tmp.path(), &[], &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!tmp.path().join("non_hardlinked_files.csv").exists());
}

#[test]
fn test_missing_root_directory_exits_one() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("movies");
    let output = seedkeeper(tmp.path(), &[missing.to_str().unwrap()], &[]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_print_config_works_without_root_directory() {
    let tmp = tempdir().unwrap();
    let output = seedkeeper(
        tmp.path(),
        &["print-config"],
        &[("SEEDKEEPER_REMOTE_API_KEY", "0123456789")],
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration"));
    assert!(!stdout.contains("0123456789"));
}

#[cfg(unix)]
#[test]
fn test_save_only_run_exits_zero_and_writes_record() {
    let tmp = tempdir().unwrap();
    let movies = tmp.path().join("movies");
    fs::create_dir_all(movies.join("Alien (1979)")).unwrap();
    fs::write(movies.join("Alien (1979)/Alien.mkv"), "alien").unwrap();

    let output = seedkeeper(tmp.path(), &[movies.to_str().unwrap()], &[]);

    assert_eq!(output.status.code(), Some(0));
    let record = fs::read_to_string(tmp.path().join("non_hardlinked_files.csv")).unwrap();
    assert!(record.starts_with("File Path\n"));
    assert!(record.contains("Alien.mkv"));
}

#[cfg(unix)]
#[test]
fn test_remote_failure_for_an_item_still_exits_zero() {
    let tmp = tempdir().unwrap();
    let movies = tmp.path().join("movies");
    fs::create_dir_all(movies.join("Alien (1979)")).unwrap();
    fs::write(movies.join("Alien (1979)/Alien.mkv"), "alien").unwrap();

    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/v3/movie");
        then.status(500);
    });
    let base_url = server.base_url();

    let output = seedkeeper(
        tmp.path(),
        &[movies.to_str().unwrap(), "--replace", "1", "--force"],
        &[
            ("SEEDKEEPER_REMOTE_BASE_URL", base_url.as_str()),
            ("SEEDKEEPER_REMOTE_API_KEY", "secret"),
            ("SEEDKEEPER_RESCAN_DELAY_SECS", "0"),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    list.assert();
    assert!(movies.join("Alien (1979)/Alien.mkv").exists());
    let record = fs::read_to_string(tmp.path().join("non_hardlinked_files.csv")).unwrap();
    assert!(record.contains("Alien.mkv"));
}
