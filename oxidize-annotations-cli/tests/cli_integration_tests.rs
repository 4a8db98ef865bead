//! Integration tests for the oxannots CLI
//!
//! Tests command-line interface functionality including:
//! - Reading sidecar files
//! - Compacting tombstones in place and to a new file
//! - Link resolution output
//! - Error handling for missing and corrupt input

use anyhow::Result;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Test helper to get the CLI binary path
fn get_cli_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    if path.ends_with("deps") {
        path.pop(); // Remove "deps" directory
    }
    path.push("oxannots");
    #[cfg(windows)]
    path.set_extension("exe");
    path
}

fn setup_temp_dir() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

fn run_cli_command(args: &[&str]) -> Result<std::process::Output> {
    let output = Command::new(get_cli_path()).args(args).output()?;
    Ok(output)
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

const RECT: &str = r#"{ "lower_left": { "x": 10.0, "y": 20.0 }, "upper_right": { "x": 110.0, "y": 40.0 } }"#;

/// Sidecar with a live link and a tombstoned note on page 0, and a video on page 3
fn write_sample_sidecar(dir: &Path) -> PathBuf {
    let path = dir.join("annotations_0.json");
    let json = format!(
        r#"{{
  "version": 1,
  "pages": {{
    "0": [
      {{ "id": "l1", "page": 0, "rect": {RECT}, "subtype": "Link",
         "target": {{ "Uri": "https://example.com" }} }},
      {{ "id": "n1", "page": 0, "rect": {RECT}, "subtype": "Note",
         "contents": "old remark", "deleted": true }}
    ],
    "3": [
      {{ "id": "v1", "page": 3, "rect": {RECT}, "subtype": "Video",
         "target": {{ "Resolved": {{ "uri": "oxidize://clips/a.mp4",
                                     "location": {{ "File": "/library/doc/clips/a.mp4" }} }} }} }}
    ]
  }}
}}"#
    );
    fs::write(&path, json).unwrap();
    path
}

fn stored_ids(path: &Path) -> Vec<(String, Vec<String>)> {
    let value: serde_json::Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
    value["pages"]
        .as_object()
        .unwrap()
        .iter()
        .map(|(page, records)| {
            let ids = records
                .as_array()
                .unwrap()
                .iter()
                .map(|r| r["id"].as_str().unwrap().to_string())
                .collect();
            (page.clone(), ids)
        })
        .collect()
}

#[test]
fn test_help_lists_commands() -> Result<()> {
    let output = run_cli_command(&["--help"])?;
    assert!(output.status.success());

    let text = stdout(&output);
    for command in ["show", "compact", "resolve"] {
        assert!(text.contains(command), "help should mention {command}");
    }
    Ok(())
}

#[test]
fn test_show_prints_every_page() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let sidecar = write_sample_sidecar(temp_dir.path());

    let output = run_cli_command(&["show", sidecar.to_str().unwrap()])?;
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Page 0 (2 annotations)"));
    assert!(text.contains("Page 3 (1 annotations)"));
    assert!(text.contains("[l1] Link"));
    assert!(text.contains("-> https://example.com"));
    assert!(text.contains("[n1] Note"));
    assert!(text.contains("(deleted)"));
    assert!(text.contains("/library/doc/clips/a.mp4"));
    Ok(())
}

#[test]
fn test_show_single_page() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let sidecar = write_sample_sidecar(temp_dir.path());

    let output = run_cli_command(&["show", sidecar.to_str().unwrap(), "--page", "3"])?;
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("[v1] Video"));
    assert!(!text.contains("[l1]"));

    let missing = run_cli_command(&["show", sidecar.to_str().unwrap(), "--page", "1"])?;
    assert!(!missing.status.success());
    Ok(())
}

#[test]
fn test_compact_in_place() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let sidecar = write_sample_sidecar(temp_dir.path());

    let output = run_cli_command(&["compact", sidecar.to_str().unwrap()])?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Removed 1 tombstoned annotations"));

    assert_eq!(
        stored_ids(&sidecar),
        vec![
            ("0".to_string(), vec!["l1".to_string()]),
            ("3".to_string(), vec!["v1".to_string()]),
        ]
    );
    Ok(())
}

#[test]
fn test_compact_to_output_leaves_input_alone() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let sidecar = write_sample_sidecar(temp_dir.path());
    let original = fs::read(&sidecar)?;
    let target = temp_dir.path().join("out").join("compacted.json");

    let output = run_cli_command(&[
        "compact",
        sidecar.to_str().unwrap(),
        "--output",
        target.to_str().unwrap(),
    ])?;
    assert!(output.status.success());

    assert_eq!(fs::read(&sidecar)?, original);
    assert_eq!(
        stored_ids(&target),
        vec![
            ("0".to_string(), vec!["l1".to_string()]),
            ("3".to_string(), vec!["v1".to_string()]),
        ]
    );
    Ok(())
}

#[test]
fn test_resolve_custom_link() -> Result<()> {
    let output = run_cli_command(&[
        "resolve",
        "mypdf://video/x.mpg",
        "--root",
        "/library/doc",
        "--protocol",
        "mypdf",
    ])?;
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("kind: Video"));
    assert!(text.contains(&format!(
        "location: {}",
        Path::new("/library/doc").join("video/x.mpg").display()
    )));
    Ok(())
}

#[test]
fn test_resolve_with_extra_mapping() -> Result<()> {
    let plain = run_cli_command(&["resolve", "oxidize://media/clip.webm"])?;
    assert!(stdout(&plain).contains("kind: Link"));

    let mapped = run_cli_command(&[
        "resolve",
        "oxidize://media/clip.webm",
        "--map",
        "webm=video",
    ])?;
    assert!(mapped.status.success());
    assert!(stdout(&mapped).contains("kind: Video"));

    let bad = run_cli_command(&["resolve", "oxidize://a.b", "--map", "webm"])?;
    assert!(!bad.status.success());
    Ok(())
}

#[test]
fn test_resolve_foreign_link() -> Result<()> {
    let output = run_cli_command(&["resolve", "https://example.com/a.mp4"])?;
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("kind: Link"));
    assert!(text.contains("not a oxidize:// link"));
    Ok(())
}

#[test]
fn test_missing_and_corrupt_sidecar() -> Result<()> {
    let temp_dir = setup_temp_dir();

    let missing = temp_dir.path().join("nope.json");
    let output = run_cli_command(&["show", missing.to_str().unwrap()])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load"));

    let corrupt = temp_dir.path().join("corrupt.json");
    fs::write(&corrupt, "{ nope")?;
    let output = run_cli_command(&["compact", corrupt.to_str().unwrap()])?;
    assert!(!output.status.success());
    Ok(())
}
