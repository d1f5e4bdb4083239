// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI integration tests.
//!
//! These tests run the actual rapcodec binary against recordings written
//! into a temporary directory.

mod common;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use common::TempDir;
use rapcodec::io::legacy::{schema, write_legacy};
use rapcodec::io::{detect_file_version, save_file, FileVersion};
use rapcodec::{Binary, Collection, EventCapture, FloatCapture, Metadata, PositionCapture, Recording};

/// Get the path to the built rapcodec binary
fn rapcodec_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rapcodec"))
}

/// Run rapcodec with arguments
fn run(args: &[&str]) -> Output {
    let bin = rapcodec_bin();
    Command::new(&bin)
        .args(args)
        .output()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", bin))
}

/// Run rapcodec and assert success
fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "Command failed: {:?}\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run rapcodec and assert failure
fn run_err(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        !output.status.success(),
        "Command should have failed but succeeded: {:?}",
        args
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Two-level recording with a little of everything.
fn write_sample(path: &Path) {
    let child = Recording::builder("Player")
        .id("player-1")
        .metadata(Metadata::new().with("team", "red"))
        .collection(Collection::new(
            "Head",
            vec![
                PositionCapture::new(0.0, 0.0, 1.7, 0.0),
                PositionCapture::new(1.0, 0.5, 1.7, 0.0),
                PositionCapture::new(2.0, 1.0, 1.7, 0.5),
            ],
        ))
        .collection(Collection::new(
            "Events",
            vec![EventCapture::new(
                1.5,
                "Jump",
                Metadata::new().with("height", 0.4f32),
            )],
        ))
        .build();
    let recording = Recording::builder("Match")
        .id("match-1")
        .metadata(Metadata::new().with("map", "harbor").with("rounds", 3i32))
        .collection(Collection::new("Score", vec![FloatCapture::new(0.0, 0.0)]))
        .binary(Binary::new("thumb", vec![1, 2, 3, 4], Metadata::new()))
        .child(child)
        .build();
    save_file(path, &recording).unwrap();
}

fn write_unordered(path: &Path) {
    let recording = Recording::builder("rec")
        .id("abc")
        .collection(Collection::new(
            "path",
            [1.0, 4.0, 3.0, 7.0]
                .iter()
                .map(|&t| FloatCapture::new(t, 0.0))
                .collect(),
        ))
        .build();
    save_file(path, &recording).unwrap();
}

fn write_v1(path: &Path) {
    let proto = schema::Recording {
        name: "Demo".into(),
        subjects: vec![schema::SubjectRecording {
            id: "1".into(),
            name: "Cube".into(),
            captured_positions: vec![
                schema::VectorCapture {
                    time: 0.0,
                    x: 1.0,
                    y: 2.0,
                    z: 3.0,
                },
                schema::VectorCapture {
                    time: 1.0,
                    x: 2.0,
                    y: 2.0,
                    z: 3.0,
                },
            ],
            ..Default::default()
        }],
        custom_events: Vec::new(),
        metadata: HashMap::new(),
    };
    let mut bytes = Vec::new();
    write_legacy(&mut bytes, &proto).unwrap();
    std::fs::write(path, bytes).unwrap();
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run_ok(&["--help"]);
    assert!(output.contains("Toolkit for RAP recording files"));
    assert!(output.contains("inspect"));
    assert!(output.contains("upgrade"));
    assert!(output.contains("metadata"));
    assert!(output.contains("validate"));
}

#[test]
fn test_cli_version() {
    let output = run_ok(&["--version"]);
    assert!(output.contains("rapcodec"));
}

#[test]
fn test_cli_invalid_subcommand() {
    let stderr = run_err(&["nonexistent"]);
    assert!(stderr.contains("unrecognized") || stderr.contains("unknown"));
}

// ============================================================================
// Inspect Tests
// ============================================================================

#[test]
fn test_inspect_info() {
    let dir = TempDir::new("cli_info");
    let path = dir.path("sample.rap");
    write_sample(&path);

    let output = run_ok(&["inspect", "info", &path_arg(&path)]);
    assert!(output.contains("Version: v2"));
    assert!(output.contains("Name: Match"));
    assert!(output.contains("Recordings: 2"));
    assert!(output.contains("Collections: 3"));
    assert!(output.contains("Captures: 5"));
    assert!(output.contains("Binaries: 1 inline, 0 referenced"));
}

#[test]
fn test_inspect_tree() {
    let dir = TempDir::new("cli_tree");
    let path = dir.path("sample.rap");
    write_sample(&path);

    let output = run_ok(&["inspect", "tree", &path_arg(&path)]);
    assert!(output.contains("[match-1] Match"));
    assert!(output.contains("  [player-1] Player | 2 collections | 4 captures"));

    let output = run_ok(&["inspect", "tree", &path_arg(&path), "--depth", "0"]);
    assert!(!output.contains("[player-1]"));
    assert!(output.contains("... 1 more"));
}

#[test]
fn test_inspect_collections_with_filter() {
    let dir = TempDir::new("cli_collections");
    let path = dir.path("sample.rap");
    write_sample(&path);

    let output = run_ok(&["inspect", "collections", &path_arg(&path), "--filter", "position"]);
    assert!(output.contains("Head | recolude.position | 3 captures"));
    assert!(!output.contains("Score"));
}

#[test]
fn test_inspect_nonexistent_file() {
    let stderr = run_err(&["inspect", "info", "/nonexistent/file.rap"]);
    assert!(stderr.contains("Error"));
}

#[test]
fn test_inspect_unknown_version() {
    let dir = TempDir::new("cli_unknown");
    let path = dir.path("bad.rap");
    std::fs::write(&path, [7u8, 0, 0]).unwrap();

    let stderr = run_err(&["inspect", "info", &path_arg(&path)]);
    assert!(stderr.contains("unsupported file version"));
}

// ============================================================================
// Upgrade Tests
// ============================================================================

#[test]
fn test_upgrade_v1() {
    let dir = TempDir::new("cli_upgrade");
    let input = dir.path("old.rap");
    let output_path = dir.path("new.rap");
    write_v1(&input);

    let output = run_ok(&["upgrade", &path_arg(&input), &path_arg(&output_path)]);
    assert!(output.contains("v1 (legacy)"));
    assert_eq!(detect_file_version(&output_path).unwrap(), FileVersion::V2);

    let upgraded = rapcodec::load_file(&output_path).unwrap();
    assert_eq!(upgraded.name(), "Demo");
    assert_eq!(upgraded.recordings()[0].name(), "Cube");
    assert_eq!(upgraded.capture_count(), 2);
}

#[test]
fn test_upgrade_with_level() {
    let dir = TempDir::new("cli_upgrade_level");
    let input = dir.path("sample.rap");
    let output_path = dir.path("copy.rap");
    write_sample(&input);

    run_ok(&[
        "upgrade",
        &path_arg(&input),
        &path_arg(&output_path),
        "--level",
        "1",
    ]);
    let copy = rapcodec::load_file(&output_path).unwrap();
    assert_eq!(copy.id(), "match-1");

    run_err(&[
        "upgrade",
        &path_arg(&input),
        &path_arg(&output_path),
        "--level",
        "12",
    ]);
}

// ============================================================================
// Metadata Tests
// ============================================================================

#[test]
fn test_metadata_json() {
    let dir = TempDir::new("cli_metadata");
    let path = dir.path("sample.rap");
    write_sample(&path);

    let output = run_ok(&["metadata", &path_arg(&path)]);
    let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
    assert_eq!(value["id"], "match-1");
    assert_eq!(value["metadata"]["map"], "harbor");
    assert_eq!(value["metadata"]["rounds"], 3);
    assert_eq!(value["binaries"][0]["name"], "thumb");
    assert_eq!(value["binaries"][0]["size"], 4);
    assert_eq!(value["recordings"][0]["metadata"]["team"], "red");
}

#[test]
fn test_metadata_pretty() {
    let dir = TempDir::new("cli_metadata_pretty");
    let path = dir.path("sample.rap");
    write_sample(&path);

    let output = run_ok(&["metadata", &path_arg(&path), "--pretty"]);
    assert!(output.contains("\n  \"id\": \"match-1\""));
}

// ============================================================================
// Validate Tests
// ============================================================================

#[test]
fn test_validate_ok() {
    let dir = TempDir::new("cli_validate");
    let path = dir.path("sample.rap");
    write_sample(&path);

    let output = run_ok(&["validate", &path_arg(&path)]);
    assert!(output.contains("OK (2 recordings, 5 captures)"));
}

#[test]
fn test_validate_out_of_order() {
    let dir = TempDir::new("cli_validate_bad");
    let path = dir.path("unordered.rap");
    write_unordered(&path);

    let stderr = run_err(&["validate", &path_arg(&path)]);
    assert!(stderr.contains("violates chronological event validator"));
}
