//! CLI subprocess integration tests.
//!
//! These tests invoke the `appinfo` binary as a subprocess and verify
//! exit codes, manifest rewrites, and JSON output.

use std::path::{Path, PathBuf};
use std::process::Command;

fn appinfo_bin(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_appinfo"));
    // Keep a developer's own config and environment out of the run.
    cmd.env("HOME", config_dir);
    cmd.env_remove("APPINFO_CONFIG");
    cmd.env_remove("APPINFO_SDK_VERSION");
    cmd.env_remove("APPINFO_LOG");
    cmd
}

fn write_package_json(dir: &Path) -> PathBuf {
    let path = dir.join("package.json");
    std::fs::write(
        &path,
        r#"{
  "name": "transit",
  "version": "1.2.0",
  "pebble": {
    "sdkVersion": "3",
    "targetPlatforms": ["aplite", "basalt", "chalk"],
    "resources": {
      "media": [
        { "type": "bitmap", "name": "IMAGE_BUS", "file": "images/bus.png" },
        { "type": "font", "name": "FONT_CLOCK_30", "file": "fonts/clock.ttf" },
        { "type": "bitmap", "name": "IMAGE_TRAIN", "file": "images/train.png" }
      ]
    }
  }
}
"#,
    )
    .unwrap();
    path
}

fn media_types(path: &Path) -> Vec<String> {
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    value["pebble"]["resources"]["media"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap().to_owned())
        .collect()
}

#[test]
fn cli_version_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = appinfo_bin(dir.path()).arg("--version").output().unwrap();
    assert!(output.status.success(), "appinfo --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("appinfo"), "{stdout}");
}

#[test]
fn cli_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let output = appinfo_bin(dir.path()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("normalize"), "help must list 'normalize'");
    assert!(stdout.contains("inspect"), "help must list 'inspect'");
}

#[test]
fn cli_normalize_without_capability_info_keeps_bitmaps() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_package_json(dir.path());
    let output = appinfo_bin(dir.path())
        .args(["normalize", manifest.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(media_types(&manifest), vec!["bitmap", "font", "bitmap"]);
}

#[test]
fn cli_normalize_no_bitmap_support_json() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_package_json(dir.path());
    let output = appinfo_bin(dir.path())
        .args([
            "normalize",
            manifest.to_str().unwrap(),
            "--no-bitmap-support",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["supported"], false);
    assert_eq!(payload["retyped"], 2);
    assert_eq!(payload["written"], true);
    assert_eq!(payload["layout"], "package");
    assert_eq!(media_types(&manifest), vec!["png", "font", "png"]);
}

#[test]
fn cli_normalize_sdk_version_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_package_json(dir.path());
    let output = appinfo_bin(dir.path())
        .env("APPINFO_SDK_VERSION", "3.14")
        .args(["normalize", manifest.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(media_types(&manifest), vec!["png", "font", "png"]);
}

#[test]
fn cli_normalize_sdk4_keeps_bitmaps() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_package_json(dir.path());
    let output = appinfo_bin(dir.path())
        .args([
            "normalize",
            manifest.to_str().unwrap(),
            "--sdk-version",
            "4.3",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(media_types(&manifest), vec!["bitmap", "font", "bitmap"]);
}

#[test]
fn cli_normalize_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_package_json(dir.path());
    let config = dir.path().join("appinfo.toml");
    std::fs::write(&config, "sdk_version = \"3.8\"\nplatforms = [\"aplite\"]\n").unwrap();
    let output = appinfo_bin(dir.path())
        .args([
            "--config",
            config.to_str().unwrap(),
            "normalize",
            manifest.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(media_types(&manifest), vec!["png", "font", "png"]);
}

#[test]
fn cli_normalize_check_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_package_json(dir.path());
    let before = std::fs::read_to_string(&manifest).unwrap();
    let output = appinfo_bin(dir.path())
        .args([
            "normalize",
            manifest.to_str().unwrap(),
            "--no-bitmap-support",
            "--check",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be retyped to png"), "{stderr}");
    assert_eq!(std::fs::read_to_string(&manifest).unwrap(), before);
}

#[test]
fn cli_normalize_shape_error_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("appinfo.json");
    std::fs::write(&manifest, r#"{ "uuid": "x", "resources": { "media": "none" } }"#).unwrap();
    let output = appinfo_bin(dir.path())
        .args([
            "normalize",
            manifest.to_str().unwrap(),
            "--no-bitmap-support",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("resources.media"), "{stderr}");
}

#[test]
fn cli_normalize_bad_sdk_version_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_package_json(dir.path());
    let output = appinfo_bin(dir.path())
        .args([
            "normalize",
            manifest.to_str().unwrap(),
            "--sdk-version",
            "three",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn cli_normalize_rejects_unknown_platform_flag() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_package_json(dir.path());
    let output = appinfo_bin(dir.path())
        .args([
            "normalize",
            manifest.to_str().unwrap(),
            "--platform",
            "tintin",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_inspect_json() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_package_json(dir.path());
    let output = appinfo_bin(dir.path())
        .args(["inspect", manifest.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["media_path"], "pebble.resources.media");
    assert_eq!(payload["bitmaps"], 2);
    assert_eq!(payload["supported"], true);
    assert_eq!(payload["source"], "default");
    assert_eq!(payload["resources"][1]["type"], "font");
    assert_eq!(payload["resources"][1]["name"], "FONT_CLOCK_30");
}

#[test]
fn cli_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    let output = appinfo_bin(dir.path())
        .args(["completions", "bash"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("appinfo"));
}

#[test]
fn cli_man_pages_written() {
    let dir = tempfile::tempdir().unwrap();
    let man_dir = dir.path().join("man");
    let output = appinfo_bin(dir.path())
        .args(["man-pages", man_dir.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(man_dir.join("appinfo.1").is_file());
    assert!(man_dir.join("appinfo-normalize.1").is_file());
}
