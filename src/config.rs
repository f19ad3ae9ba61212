//! CLI definition and internal configuration for trap analysis.

use clap::Parser;
use clap_verbosity_flag::Verbosity;
use std::path::PathBuf;

/// Parse a probability value, ensuring it lies in [0.0, 1.0].
pub fn parse_probability(s: &str) -> Result<f32, String> {
    let val = s
        .parse::<f32>()
        .map_err(|_| format!("Invalid number: '{s}'"))?;
    if !(0.0..=1.0).contains(&val) {
        return Err(format!("Must be between 0.0 and 1.0, got {val}"));
    }
    Ok(val)
}

/// Command-line interface for the trap analyzer.
#[derive(Parser, Debug, Clone)]
#[command(name = "trapscan")]
#[command(about = "Sticky-trap insect classification toolkit")]
#[command(version)]
pub struct Cli {
    /// Path to the sticky-trap photograph to analyze
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Path to the ONNX classifier model
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,

    /// Confidence threshold: classifications at or below it are discarded
    #[arg(short, long, default_value = "0.25", value_parser = parse_probability)]
    pub confidence: f32,

    /// Device to use for inference (auto, cpu, coreml)
    #[arg(long, default_value = "auto")]
    pub device: String,

    /// Verbosity level (-q/--quiet, -v/-vv/-vvv/-vvvv for info/debug/trace)
    #[command(flatten)]
    pub verbosity: Verbosity,

    /// Disable colored output (also respects NO_COLOR and TRAPSCAN_NO_COLOR env vars)
    #[arg(long)]
    pub no_color: bool,
}

/// Internal configuration for a single analysis run
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// Photograph to analyze
    pub image_path: PathBuf,
    /// Classifier model file
    pub model_path: PathBuf,
    /// Acceptance threshold (strictly greater than)
    pub confidence: f32,
    /// Device for inference
    pub device: String,
}

impl AnalyzeConfig {
    pub fn from_args(cli: &Cli) -> Self {
        Self {
            image_path: cli.image.clone(),
            model_path: cli.model.clone(),
            confidence: cli.confidence,
            device: cli.device.clone(),
        }
    }
}
