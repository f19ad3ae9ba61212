use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run the trapscan binary with the given arguments.
/// Returns (exit_code, stdout, stderr).
fn run_trapscan(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_trapscan"))
        .args(args)
        .output()
        .expect("Failed to execute trapscan binary");

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// Write a plausible trap photo: a yellow board patch on a gray background.
fn write_trap_photo(path: &Path) {
    let mut img = image::RgbImage::from_pixel(96, 64, image::Rgb([120, 120, 120]));
    for y in 8..56 {
        for x in 12..84 {
            img.put_pixel(x, y, image::Rgb([230, 200, 40]));
        }
    }
    img.save(path).expect("Failed to write test photo");
}

fn parse_payload(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout.trim()).expect("stdout should be a single JSON document")
}

#[test]
fn test_help_output() {
    let (exit_code, stdout, _) = run_trapscan(&["--help"]);
    assert_eq!(exit_code, 0);
    assert!(stdout.contains("Sticky-trap insect classification toolkit"));
    assert!(stdout.contains("IMAGE"));
    assert!(stdout.contains("MODEL"));
    assert!(stdout.contains("--confidence"));
}

#[test]
fn test_missing_arguments_is_a_usage_error() {
    let (exit_code, _, stderr) = run_trapscan(&[]);
    assert_ne!(exit_code, 0);
    assert!(stderr.contains("Usage"));
}

#[test]
fn test_bogus_model_yields_error_payload_and_clean_exit() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let photo_path = temp_dir.path().join("trap.png");
    let model_path = temp_dir.path().join("model.onnx");
    write_trap_photo(&photo_path);
    std::fs::write(&model_path, b"not an onnx model").expect("Failed to write model file");

    let (exit_code, stdout, _) = run_trapscan(&[
        photo_path.to_str().unwrap(),
        model_path.to_str().unwrap(),
    ]);

    // Failures are reported in the payload, not the exit code.
    assert_eq!(exit_code, 0);
    let payload = parse_payload(&stdout);
    let message = payload["error"]
        .as_str()
        .expect("error payload should carry a string message");
    assert!(!message.is_empty());
    assert_ne!(message, "Image not found");
    assert!(payload.get("total_insects").is_none());
}

#[test]
fn test_missing_model_file_yields_error_payload() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let photo_path = temp_dir.path().join("trap.png");
    write_trap_photo(&photo_path);

    let (exit_code, stdout, _) = run_trapscan(&[
        photo_path.to_str().unwrap(),
        temp_dir.path().join("missing.onnx").to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 0);
    let payload = parse_payload(&stdout);
    assert!(payload["error"].is_string());
}

#[test]
fn test_model_failure_reported_even_when_image_is_also_missing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.onnx");
    std::fs::write(&model_path, b"garbage").expect("Failed to write model file");

    let (exit_code, stdout, _) = run_trapscan(&[
        temp_dir.path().join("missing.png").to_str().unwrap(),
        model_path.to_str().unwrap(),
    ]);

    // The model loads before the photograph, so the error is the model's.
    assert_eq!(exit_code, 0);
    let payload = parse_payload(&stdout);
    assert_ne!(payload["error"].as_str().unwrap(), "Image not found");
}

#[test]
fn test_stdout_stays_pure_json_under_verbose_logging() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let photo_path = temp_dir.path().join("trap.png");
    let model_path = temp_dir.path().join("model.onnx");
    write_trap_photo(&photo_path);
    std::fs::write(&model_path, b"garbage").expect("Failed to write model file");

    let (exit_code, stdout, stderr) = run_trapscan(&[
        photo_path.to_str().unwrap(),
        model_path.to_str().unwrap(),
        "-vv",
        "--no-color",
    ]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout.trim().lines().count(), 1);
    parse_payload(&stdout);
    // Logging lands on stderr, never stdout.
    assert!(stderr.contains("[DEBUG]") || stderr.contains("[INFO]"));
}
