mod common;

use std::fs;

use common::{Layout, find_model_path};
use serde_json::Value;

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn empty_mask_directory_fails_before_writing_anything() {
    let layout = Layout::new();
    layout.add_photo("a.jpg");

    let output = run_cli!(layout, []);

    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("no decoration masks"),
        "unexpected stderr: {}",
        stderr(&output)
    );
    assert!(verify_output_files!(layout.output, "jpg").is_empty());
    assert!(!layout.output.exists());
}

#[test]
fn missing_photos_fail_setup() {
    let layout = Layout::new();
    layout.add_mask("mask1.png");

    let output = run_cli!(layout, []);

    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("no source images"),
        "unexpected stderr: {}",
        stderr(&output)
    );
}

#[test]
fn missing_model_is_reported() {
    let layout = Layout::new();
    layout.add_mask("mask1.png");
    layout.add_photo("a.jpg");
    let model = layout.temp_dir.path().join("nowhere.bin");

    let output = run_cli!(layout, ["--model", model.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("face detection model"),
        "unexpected stderr: {}",
        stderr(&output)
    );
    assert!(verify_output_files!(layout.output, "jpg").is_empty());
}

#[test]
fn unreadable_config_is_an_error() {
    let layout = Layout::new();
    let config = layout.temp_dir.path().join("broken.json");
    fs::write(&config, "{ not json").unwrap();

    let output = run_cli!(layout, ["--config", config.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to parse settings JSON"));
}

#[test]
fn save_config_writes_resolved_settings() {
    let layout = Layout::new();
    let saved = layout.temp_dir.path().join("config/resolved.json");

    // Setup fails on the empty mask folder, but the settings are written first.
    let output = run_cli!(
        layout,
        [
            "--save-config",
            saved.to_str().unwrap(),
            "--output-width",
            "320",
            "--seed",
            "5"
        ]
    );
    assert!(!output.status.success());

    let json: Value = serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();
    assert_eq!(json["resize"]["output_width"], 320);
    assert_eq!(json["batch"]["seed"], 5);
    assert_eq!(
        json["paths"]["masks_dir"],
        layout.masks.to_str().unwrap()
    );
}

#[test]
fn batch_with_model_writes_outputs_and_report() {
    let Some(model) = find_model_path() else {
        eprintln!("Skipping test: model not found");
        return;
    };
    let model = model.canonicalize().expect("canonical model path");
    let layout = Layout::new();
    layout.add_mask("mask1.png");
    layout.add_photo("first.jpg");
    layout.add_photo("second.jpeg");
    let report = layout.temp_dir.path().join("report.json");

    let output = run_cli!(
        layout,
        [
            "--model",
            model.to_str().unwrap(),
            "--seed",
            "11",
            "--report",
            report.to_str().unwrap()
        ]
    );
    assert_cli_success!(output, "CLI should process the batch");

    let files = verify_output_files!(layout.output, "jpg");
    assert_eq!(files.len(), 2);
    for entry in &files {
        let decoded = image::open(entry.path()).expect("valid jpeg");
        assert_eq!(decoded.width(), 512);
    }

    let json: Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["saved"], 2);
    assert_eq!(json["images"][0]["status"], "saved");
    assert_eq!(json["images"][1]["sequence"], 2);
}
