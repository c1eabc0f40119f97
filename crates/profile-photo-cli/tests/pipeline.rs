//! Pipeline integration tests using synthetic images.
//!
//! Runs the binary end to end over photos generated at test time.

#![allow(clippy::unwrap_used, clippy::float_cmp, deprecated)]

use std::path::Path;

use assert_cmd::Command;
use profile_photo_test_support::{FaceBuilder, SyntheticImageBuilder};
use serde_json::Value;

fn command_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("profile-photo").unwrap();
    cmd.current_dir(dir).env("XDG_CONFIG_HOME", dir);
    cmd
}

fn write_portrait(dir: &Path, name: &str, width: u32, height: u32) {
    let img = SyntheticImageBuilder::portrait_scene(width, height);
    std::fs::write(dir.join(name), SyntheticImageBuilder::png(&img)).unwrap();
}

fn write_sidecar(dir: &Path, photo: &str, width: u32, height: u32) {
    let faces = vec![FaceBuilder::portrait(width, height)];
    std::fs::write(
        dir.join(format!("{photo}.faces.json")),
        serde_json::to_string(&faces).unwrap(),
    )
    .unwrap();
}

/// Runs a JSON-format batch over `dir`, returning the exit code and document.
fn score_dir(dir: &Path, extra: &[&str]) -> (Option<i32>, Value) {
    let output = command_in(dir)
        .args(["--format", "json", "-q"])
        .args(extra)
        .arg(dir)
        .output()
        .unwrap();
    let doc = serde_json::from_slice(&output.stdout).unwrap();
    (output.status.code(), doc)
}

// === Batch Isolation ===

#[test]
fn test_corrupt_photo_fails_alone() {
    let dir = tempfile::tempdir().unwrap();
    write_portrait(dir.path(), "a.png", 200, 240);
    let img = SyntheticImageBuilder::checkerboard(64, 64);
    std::fs::write(
        dir.path().join("b.png"),
        SyntheticImageBuilder::truncated_png(&img),
    )
    .unwrap();
    std::fs::write(dir.path().join("c.jpg"), SyntheticImageBuilder::garbage()).unwrap();

    let (code, doc) = score_dir(dir.path(), &[]);

    assert_eq!(code, Some(1));
    assert_eq!(doc["summary"]["total"], 3);
    assert_eq!(doc["summary"]["successful"], 1);
    assert_eq!(doc["summary"]["failed"], 2);

    let entries = doc["entries"].as_array().unwrap();
    assert_eq!(entries[0]["success"], true);
    assert_eq!(entries[1]["success"], false);
    assert!(entries[1]["error"].as_str().unwrap().contains("decode"));
    assert!(entries[1].get("result").is_none());
}

// === Face Sidecars ===

#[test]
fn test_sidecar_faces_are_scored() {
    let dir = tempfile::tempdir().unwrap();
    write_portrait(dir.path(), "me.png", 300, 400);
    write_sidecar(dir.path(), "me.png", 300, 400);

    let (code, doc) = score_dir(dir.path(), &[]);
    assert_eq!(code, Some(0));

    let result = &doc["entries"][0]["result"];
    assert_eq!(result["faces"]["faces_detected"], 1);
    assert_eq!(result["faces"]["dominant_expression"], "happy");
    assert!(result.get("warning").is_none());
    assert!(result["lifestyle_tags"]
        .as_array()
        .unwrap()
        .contains(&Value::from("solo_portrait")));
}

#[test]
fn test_missing_sidecar_reports_warning() {
    let dir = tempfile::tempdir().unwrap();
    write_portrait(dir.path(), "me.png", 300, 400);

    let (code, doc) = score_dir(dir.path(), &[]);
    assert_eq!(code, Some(0));

    let result = &doc["entries"][0]["result"];
    assert_eq!(result["faces"]["faces_detected"], 0);
    assert!(result["warning"]
        .as_str()
        .unwrap()
        .contains("face detection backend"));
}

#[test]
fn test_custom_sidecar_suffix() {
    let dir = tempfile::tempdir().unwrap();
    write_portrait(dir.path(), "me.png", 300, 400);
    let faces = vec![FaceBuilder::portrait(300, 400)];
    std::fs::write(
        dir.path().join("me.png.det"),
        serde_json::to_string(&faces).unwrap(),
    )
    .unwrap();

    let (_, doc) = score_dir(dir.path(), &["--sidecar-suffix", ".det"]);
    assert_eq!(doc["entries"][0]["result"]["faces"]["faces_detected"], 1);
}

// === Summary ===

#[test]
fn test_best_photo_is_highest_score() {
    let dir = tempfile::tempdir().unwrap();
    write_portrait(dir.path(), "faceless.png", 200, 200);
    write_portrait(dir.path(), "portrait.png", 400, 400);
    write_sidecar(dir.path(), "portrait.png", 400, 400);

    let (_, doc) = score_dir(dir.path(), &[]);

    let scores: Vec<f64> = doc["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["result"]["attractiveness"]["overall_score"].as_f64().unwrap())
        .collect();
    let best = scores.iter().copied().fold(f64::MIN, f64::max);
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;

    assert_eq!(doc["summary"]["best_photo_score"].as_f64(), Some(best));
    assert!((doc["summary"]["average_score"].as_f64().unwrap() - mean).abs() < 1e-9);
    assert!(doc["summary"]["best_photo_id"]
        .as_str()
        .unwrap()
        .ends_with("portrait.png"));
}

#[test]
fn test_recursive_scan() {
    let dir = tempfile::tempdir().unwrap();
    write_portrait(dir.path(), "top.png", 120, 120);
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write_portrait(&nested, "deep.png", 120, 120);

    let (_, flat) = score_dir(dir.path(), &[]);
    assert_eq!(flat["summary"]["total"], 1);

    let (_, deep) = score_dir(dir.path(), &["-r"]);
    assert_eq!(deep["summary"]["total"], 2);
}

#[test]
fn test_rescoring_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    write_portrait(dir.path(), "me.png", 240, 320);
    write_sidecar(dir.path(), "me.png", 240, 320);

    let (_, first) = score_dir(dir.path(), &[]);
    let (_, second) = score_dir(dir.path(), &[]);

    let a = &first["entries"][0]["result"];
    let b = &second["entries"][0]["result"];
    for field in ["quality", "composition", "attractiveness", "overall_rating"] {
        assert_eq!(a[field], b[field], "{field} differs between runs");
    }
}
