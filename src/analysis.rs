//! End-to-end analysis of a single sticky-trap photograph.

use anyhow::{bail, Context, Result};
use image::{DynamicImage, GenericImageView};
use log::{debug, info};
use ort::value::Value;
use std::path::Path;
use std::time::Instant;

use crate::board_detection::{crop_to_board, locate_board};
use crate::classify_postprocessing::extract_classifications;
use crate::classify_preprocessing::{preprocess_image, CLASSIFY_INPUT_SIZE};
use crate::color_utils::symbols;
use crate::config::AnalyzeConfig;
use crate::model_metadata::class_names_from_session;
use crate::onnx_session::{create_onnx_session, determine_optimal_device, SessionConfig};
use crate::report::{summarize, AnalysisSummary};

/// Load the trap photograph from disk.
///
/// Every load failure surfaces as the fixed `Image not found` message; that
/// exact string is the error payload consumers match on.
pub fn load_trap_image(path: &Path) -> Result<DynamicImage> {
    match image::open(path) {
        Ok(img) => Ok(img),
        Err(e) => {
            debug!("Image load failed for {}: {e}", path.display());
            bail!("Image not found")
        }
    }
}

/// Run the full pipeline: load model, locate the board, classify, tally.
///
/// The model is loaded before the photograph, so a broken model path is
/// reported even when the image path is also bad.
pub fn run_analysis(config: &AnalyzeConfig) -> Result<AnalysisSummary> {
    let processing_start = Instant::now();

    let device = determine_optimal_device(&config.device);
    debug!("⚙️  Device: {} ({})", device.device, device.reason);

    let mut session = create_onnx_session(
        &config.model_path,
        &SessionConfig {
            device: &device.device,
        },
    )?;
    let class_names = class_names_from_session(&session);

    let img = load_trap_image(&config.image_path)?;
    let (orig_width, orig_height) = img.dimensions();
    debug!(
        "📷 Processing {}: {}x{}",
        config.image_path.display(),
        orig_width,
        orig_height
    );

    let img = match locate_board(&img) {
        Some(region) => {
            info!(
                "🟨 Board located: {}x{} at ({}, {}), {} px",
                region.width, region.height, region.x, region.y, region.pixel_area
            );
            crop_to_board(&img, &region)
        }
        None => {
            debug!("No board-colored region found, classifying the full image");
            img
        }
    };

    let input_tensor = preprocess_image(&img, CLASSIFY_INPUT_SIZE)?;

    let input_name = session
        .inputs
        .first()
        .map(|input| input.name.clone())
        .context("Model declares no inputs")?;
    let output_name = session
        .outputs
        .first()
        .map(|output| output.name.clone())
        .context("Model declares no outputs")?;

    let inference_start = Instant::now();
    let input_value = Value::from_array(input_tensor)
        .map_err(|e| anyhow::anyhow!("Failed to create input value: {}", e))?;
    let outputs = session
        .run(ort::inputs![input_name.as_str() => &input_value])
        .map_err(|e| anyhow::anyhow!("Failed to run inference: {}", e))?;
    let output_view = outputs[output_name.as_str()]
        .try_extract_array::<f32>()
        .map_err(|e| anyhow::anyhow!("Failed to extract output tensor: {}", e))?;
    debug!(
        "⚡ Inference completed in {:.1} ms",
        inference_start.elapsed().as_secs_f64() * 1000.0
    );

    let results = extract_classifications(&output_view, &class_names)?;
    let summary = summarize(&results, config.confidence);

    info!(
        "{} Counted {} insect(s) in {:.1} ms",
        symbols::completed_successfully(),
        summary.total_insects,
        processing_start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(summary)
}
