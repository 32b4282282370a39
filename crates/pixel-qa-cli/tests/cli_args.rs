//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use pixel_qa_test_support::SyntheticImageBuilder;
use predicates::prelude::*;
use tempfile::TempDir;

/// Writes a clean 320x180 gradient into a fresh temp dir.
fn clean_fixture() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("clean.png");
    SyntheticImageBuilder::clean_image()
        .buffer
        .as_rgb()
        .save(&path)
        .unwrap();
    (temp_dir, path)
}

/// Command isolated from the user's config files and environment.
fn pixel_qa(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pixel-qa").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("PIXEL_QA_PRESET");
    cmd
}

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    pixel_qa(temp_dir.path()).assert().code(2).stderr(
        predicate::str::contains("No paths specified")
            .or(predicate::str::contains("required"))
            .or(predicate::str::contains("PATHS")),
    );
}

#[test]
fn test_nonexistent_path_warns_but_continues() {
    let temp_dir = tempfile::tempdir().unwrap();
    pixel_qa(temp_dir.path())
        .arg("/nonexistent/path/to/image.jpg")
        .assert()
        .code(0) // No images processed = no issues
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_empty_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    pixel_qa(temp_dir.path())
        .arg(temp_dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_check_subcommand_equivalent() {
    let (temp_dir, path) = clean_fixture();
    pixel_qa(temp_dir.path())
        .arg("check")
        .arg(&path)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("clean.png"));
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    let (temp_dir, path) = clean_fixture();
    pixel_qa(temp_dir.path())
        .args(["--format", "xml"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

// === Threshold Validation Tests ===

#[test]
fn test_border_fill_threshold_above_one_rejected() {
    let (temp_dir, path) = clean_fixture();
    pixel_qa(temp_dir.path())
        .args(["--border-fill-threshold", "1.5"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("0.0..=1.0"));
}

#[test]
fn test_uniform_threshold_non_numeric_rejected() {
    let (temp_dir, path) = clean_fixture();
    pixel_qa(temp_dir.path())
        .args(["--uniform-threshold", "abc"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn test_negative_tolerance_rejected() {
    let (temp_dir, path) = clean_fixture();
    pixel_qa(temp_dir.path())
        .args(["--color-tolerance=-3"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn test_valid_threshold_boundaries() {
    let (temp_dir, path) = clean_fixture();
    for value in ["0.0", "1.0"] {
        pixel_qa(temp_dir.path())
            .args(["--background-threshold", value])
            .arg(&path)
            .assert()
            .code(predicate::in_iter([0, 1]));
    }
}

#[test]
fn test_unknown_preset_rejected() {
    let (temp_dir, path) = clean_fixture();
    pixel_qa(temp_dir.path())
        .args(["--preset", "vivid"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown preset"));
}

#[test]
fn test_malformed_target_ratios_exit_two() {
    let (temp_dir, path) = clean_fixture();
    pixel_qa(temp_dir.path())
        .args(["--target-ratios", "16:9,wide"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("malformed aspect ratio"));
}

// === Detector Switches ===

#[test]
fn test_all_detectors_disabled_passes() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("blank.png");
    SyntheticImageBuilder::blank_image()
        .buffer
        .as_rgb()
        .save(&path)
        .unwrap();

    pixel_qa(temp_dir.path())
        .args([
            "--no-border-fill",
            "--no-uniform-color",
            "--no-background",
            "--no-ratio",
        ])
        .arg(&path)
        .assert()
        .code(0);
}

// === Verbosity Level Tests ===

#[test]
fn test_verbosity_levels() {
    let (temp_dir, path) = clean_fixture();
    for flag in ["-v", "-vv", "-vvv"] {
        pixel_qa(temp_dir.path())
            .arg(flag)
            .arg(&path)
            .assert()
            .code(0);
    }
}

#[test]
fn test_quiet_suppresses_summary() {
    let (temp_dir, path) = clean_fixture();
    pixel_qa(temp_dir.path())
        .arg("-q")
        .arg(&path)
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Summary").not());
}

#[test]
fn test_summary_on_stderr() {
    let (temp_dir, path) = clean_fixture();
    pixel_qa(temp_dir.path())
        .arg(&path)
        .assert()
        .code(0)
        .stderr(predicate::str::contains(
            "Summary: 1 analyzed, 0 problematic, 1 passed, 0 skipped",
        ));
}

// === Config Subcommand ===

#[test]
fn test_config_show_lists_presets() {
    let temp_dir = tempfile::tempdir().unwrap();
    pixel_qa(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strict").and(predicate::str::contains("document")));
}

#[test]
fn test_config_show_preset_is_toml() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = pixel_qa(temp_dir.path())
        .args(["config", "show", "strict"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let parsed: toml::Table = toml::from_str(&text).unwrap();
    assert_eq!(parsed["uniform_color"]["color_space"].as_str(), Some("LAB"));
    assert_eq!(parsed["ratio"]["minimum_width"].as_integer(), Some(200));
}

#[test]
fn test_config_keys_lists_schema() {
    let temp_dir = tempfile::tempdir().unwrap();
    pixel_qa(temp_dir.path())
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("DETECTOR_RATIO_ENABLED")
                .and(predicate::str::contains("RATIO_TARGET_RATIOS"))
                .and(predicate::str::contains("UNIFORM_COLOR_COVERAGE_THRESHOLD")),
        );
}
