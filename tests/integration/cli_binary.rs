//! Runs the f1-telget binary in an isolated working directory.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

use crate::integration::test_utils::{seed_bahrain, OFFLINE_BASE_URL};

fn command_in(dir: &Path, args: &[&str]) -> Command {
    let home = dir.join("home");
    fs::create_dir_all(&home).unwrap();
    let mut command = Command::new(env!("CARGO_BIN_EXE_f1-telget"));
    command
        .current_dir(dir)
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_STATE_HOME", home.join("state"))
        .env_remove("TELGET_LOG")
        .args(args);
    command
}

/// Run the binary with `dir` as working directory and a private config home.
fn run_in(dir: &Path, args: &[&str]) -> Output {
    command_in(dir, args).stdin(Stdio::null()).output().unwrap()
}

/// Same as [`run_in`], feeding `input` on stdin.
fn run_with_stdin(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = command_in(dir, args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_missing_batch_file_processes_nothing() {
    let temp = TempDir::new().unwrap();
    let output = run_in(temp.path(), &["--quiet", "--json", "absent.json"]);

    assert!(output.status.success(), "stderr={:?}", String::from_utf8_lossy(&output.stderr));
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("Cache enabled at: ./f1-telget-cache\n"));
    assert!(stdout.contains("Error: JSON file not found at 'absent.json'"));
    assert!(stdout.contains("No configurations to process. Exiting."));
    assert!(temp.path().join("f1-telget-cache").is_dir());
}

const INVALID_SESSION_FLAGS: [&str; 11] = [
    "--quiet",
    "--no-cache",
    "--no-color",
    "--year",
    "2023",
    "--race",
    "Bahrain",
    "--session",
    "XX",
    "--driver",
    "VER",
];

#[test]
fn test_failed_job_still_completes_the_run() {
    let temp = TempDir::new().unwrap();
    let output = run_in(temp.path(), &INVALID_SESSION_FLAGS);

    assert_eq!(output.status.code(), Some(0));
    let stdout = stdout_of(&output);
    assert!(!stdout.contains("Cache enabled at"));
    assert!(stdout.contains("Using configuration from command-line arguments."));
    assert!(stdout.contains("An error occurred for configuration"));
    assert!(stdout.contains("Unknown session identifier: XX"));
    assert!(stdout.contains("All configurations processed."));
    assert!(stdout.contains("Saved: 0  No data: 0  Failed: 1"));
}

#[test]
fn test_fail_on_error_sets_exit_status() {
    let temp = TempDir::new().unwrap();
    let mut args = INVALID_SESSION_FLAGS.to_vec();
    args.push("--fail-on-error");
    let output = run_in(temp.path(), &args);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).contains("All configurations processed."));
}

#[test]
fn test_piped_interactive_answers() {
    let temp = TempDir::new().unwrap();
    let output = run_with_stdin(
        temp.path(),
        &["--quiet", "--no-cache", "--no-color"],
        "2023\nBahrain\nxx\nver\n",
    );

    assert!(output.status.success(), "stderr={}", String::from_utf8_lossy(&output.stderr));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Entering interactive mode."));
    assert!(stdout.contains("Enter the 3-letter driver code (e.g., 'VER'): "));
    assert!(stdout.contains(r#""session":"XX""#));
    assert!(stdout.contains(r#""driver":"VER""#));
    assert!(stdout.contains("Unknown session identifier: XX"));
    assert!(stdout.contains("All configurations processed."));
}

#[test]
fn test_piped_input_ending_early_cancels() {
    let temp = TempDir::new().unwrap();
    let output = run_with_stdin(temp.path(), &["--quiet", "--no-cache"], "2023\n");

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Interactive input cancelled by user."));
    assert!(stdout.contains("No configurations to process. Exiting."));
}

#[test]
fn test_batch_file_against_seeded_cache() {
    let temp = TempDir::new().unwrap();
    seed_bahrain(&temp.path().join("responses"));
    fs::write(
        temp.path().join("telget.toml"),
        format!(
            "[provider]\nbase_url = \"{}\"\nconnect_timeout_secs = 1\n\n[cache]\npath = \"responses\"\n\n[output]\ndir = \"csv\"\n",
            OFFLINE_BASE_URL
        ),
    )
    .unwrap();
    fs::write(
        temp.path().join("jobs.json"),
        r#"[
            {"year": 2023, "race": "Bahrain", "session": "R", "driver": "VER"},
            {"year": 2023, "race": "Bahrain", "session": "R", "driver": "XYZ"}
        ]"#,
    )
    .unwrap();

    let output = run_in(temp.path(), &["--quiet", "--no-color", "--json", "jobs.json"]);

    assert!(output.status.success(), "stdout={}", stdout_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Cache enabled at: responses"));
    assert!(stdout.contains("Loading configurations from JSON file: jobs.json"));
    assert!(stdout.contains("Saved: 1  No data: 1  Failed: 0"));
    let csv = temp.path().join("csv").join("2023-bahrain-r-ver-telemetry.csv");
    assert!(csv.exists());
    assert_eq!(fs::read_to_string(csv).unwrap().lines().count(), 3);
}

#[test]
fn test_malformed_config_file_is_reported() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.toml"), "[provider]\nbase_url = \"ftp://nowhere\"\n").unwrap();

    let output = run_in(temp.path(), &["--quiet", "--config", "bad.toml", "--json", "x.json"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("base_url"), "stderr={}", stderr);
}
