/// Common test utilities and macros for CLI integration tests
use std::{fs, path::PathBuf};

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

pub fn find_model_path() -> Option<PathBuf> {
    let candidates = vec![
        "models/seeta_fd_frontal_v1.0.bin",
        "../models/seeta_fd_frontal_v1.0.bin",
    ];
    candidates
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Scratch layout mirroring the default `masks/`, `input/`, `output/` folders.
pub struct Layout {
    pub temp_dir: TempDir,
    pub masks: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Layout {
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("create temp dir");
        let masks = temp_dir.path().join("masks");
        let input = temp_dir.path().join("input");
        let output = temp_dir.path().join("output");
        fs::create_dir_all(&masks).expect("create masks dir");
        fs::create_dir_all(&input).expect("create input dir");
        Self {
            temp_dir,
            masks,
            input,
            output,
        }
    }

    pub fn add_mask(&self, name: &str) {
        RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 255]))
            .save(self.masks.join(name))
            .expect("write mask");
    }

    pub fn add_photo(&self, name: &str) {
        RgbImage::from_fn(640, 480, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]))
            .save(self.input.join(name))
            .expect("write photo");
    }
}

/// Macro to verify output files exist in directory.
///
/// Returns a Vec of DirEntry for files matching the extension.
///
/// # Usage
///
/// ```ignore
/// let files = verify_output_files!(output_dir, "jpg");
/// assert!(!files.is_empty(), "Should have output files");
/// ```
#[macro_export]
macro_rules! verify_output_files {
    ($output_dir:expr, $ext:literal) => {{
        std::fs::read_dir(&$output_dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| {
                        e.path()
                            .extension()
                            .and_then(|e| e.to_str())
                            .map(|e| e == $ext)
                            .unwrap_or(false)
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    }};
}

/// Macro to run the CLI against a [`Layout`] with extra arguments.
///
/// Returns the Command output.
///
/// # Usage
///
/// ```ignore
/// let output = run_cli!(layout, ["--seed", "7"]);
/// assert!(output.status.success());
/// ```
#[macro_export]
macro_rules! run_cli {
    ($layout:expr, [$($arg:expr),*]) => {{
        std::process::Command::new(env!("CARGO_BIN_EXE_picasso"))
            .current_dir($layout.temp_dir.path())
            .args([
                "--masks",
                $layout.masks.to_str().unwrap(),
                "--input",
                $layout.input.to_str().unwrap(),
                "--output",
                $layout.output.to_str().unwrap(),
                $($arg,)*
            ])
            .output()
            .expect("execute CLI")
    }};
}

/// Macro to assert CLI success and print stderr on failure.
///
/// # Usage
///
/// ```ignore
/// assert_cli_success!(output, "CLI should succeed");
/// ```
#[macro_export]
macro_rules! assert_cli_success {
    ($output:expr, $msg:literal) => {{
        if !$output.status.success() {
            eprintln!("CLI stderr: {}", String::from_utf8_lossy(&$output.stderr));
        }
        assert!($output.status.success(), $msg);
    }};
}
