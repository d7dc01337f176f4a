//! Integration tests for the `watermarker` binary.
//!
//! Jobs run with `--dry-run` so VLC never has to be installed.

#![allow(deprecated)] // cargo_bin deprecation, replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const OVERLAYS_INI: &str = "\
[Marquee]
marquee = Sample text
size = 30
color = 0xFFFFFF
x = 20
y = 20
position = 10
opacity = 255

[Logo]
logoFileName = x.png
x = 20
y = 20
position = 10
opacity = 255
";

fn watermarker() -> Command {
    Command::cargo_bin("watermarker").expect("binary 'watermarker' should be built")
}

/// Base directory with a config file and the given source videos
fn workspace(videos: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    fs::write(dir.path().join("overlays.ini"), OVERLAYS_INI).expect("write config");
    let source = dir.path().join("tobewatermarked");
    fs::create_dir_all(&source).expect("create source dir");
    for name in videos {
        fs::write(source.join(name), b"video").expect("write video");
    }
    dir
}

fn base_arg(dir: &Path) -> String {
    dir.display().to_string()
}

#[test]
fn help_flag_shows_usage() {
    watermarker()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: watermarker"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn incomplete_command_is_rejected() {
    watermarker()
        .arg("logo")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Cannot process incomplete command"));
}

#[test]
fn unknown_overlay_is_rejected_without_launching() {
    let dir = workspace(&["v.mp4"]);
    watermarker()
        .args(["--base-dir", &base_arg(dir.path()), "sticker", "batch"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("The overlay \"sticker\" is invalid"))
        .stdout(predicate::str::contains("Processing").not());
}

#[test]
fn single_task_without_file_is_rejected() {
    watermarker()
        .args(["logo", "single"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Incorrect arguments for task"));
}

#[test]
fn dry_run_batch_prints_logo_command() {
    let dir = workspace(&["v.mp4", "readme.txt"]);
    let logo = dir.path().join("logos").join("x.png");
    let output = dir.path().join("watermarked").join("v.mp4");

    watermarker()
        .args(["--base-dir", &base_arg(dir.path()), "--dry-run", "logo", "batch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting batch-watermarking"))
        .stdout(predicate::str::contains("Processing: \"v.mp4\""))
        .stdout(predicate::str::contains("readme.txt").not())
        .stdout(predicate::str::contains(format!(
            "logo{{file='{}',x=20,y=20,position=10,opacity=255}}",
            logo.display()
        )))
        .stdout(predicate::str::contains(output.display().to_string()))
        .stdout(predicate::str::contains("Batch-watermarking completed"));
}

#[test]
fn dry_run_batch_with_no_videos() {
    let dir = workspace(&[]);
    watermarker()
        .args(["--base-dir", &base_arg(dir.path()), "--dry-run", "l", "b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing").not())
        .stdout(predicate::str::contains("Batch-watermarking completed"));
}

#[test]
fn dry_run_multiple_reports_missing_files() {
    let dir = workspace(&["a.mp4"]);
    watermarker()
        .args([
            "--base-dir",
            &base_arg(dir.path()),
            "--dry-run",
            "marquee",
            "multiple",
            "a.mp4,b.txt,c.mp4",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("The file name \"b.txt\" is invalid"))
        .stdout(predicate::str::contains("Processing: \"a.mp4\""))
        .stdout(predicate::str::contains("marq{marquee='Sample text',"))
        .stdout(predicate::str::contains("Skipping \"c.mp4\": file not found"))
        .stdout(predicate::str::contains("failed: c.mp4"));
}

#[test]
fn missing_config_is_an_error() {
    let dir = tempfile::tempdir().expect("create tempdir");
    watermarker()
        .args(["--base-dir", &base_arg(dir.path()), "--dry-run", "logo", "batch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlay configuration"));
}

#[test]
fn wizard_aborts_on_end_of_input() {
    let dir = workspace(&[]);
    watermarker()
        .args(["--base-dir", &base_arg(dir.path()), "--dry-run"])
        .write_stdin("marquee\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("What type of watermark do you want?"))
        .stdout(predicate::str::contains("Application aborted, now quitting"));
}

#[test]
fn wizard_defaults_to_logo_batch() {
    let dir = workspace(&["v.mp4"]);
    watermarker()
        .args(["--base-dir", &base_arg(dir.path()), "--dry-run"])
        .write_stdin("\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting batch-watermarking"))
        .stdout(predicate::str::contains("logo{file="));
}
