use anyhow::Result;
use ndarray::ArrayViewD;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model_metadata::display_name;
use crate::report::ClassificationResult;

/// Turn the raw classifier output into top-1 results.
///
/// Accepts either a `[batch, classes]` tensor or a bare `[classes]` vector.
/// Rows with no scores at all are dropped rather than treated as errors.
pub fn extract_classifications(
    output: &ArrayViewD<'_, f32>,
    class_names: &HashMap<usize, String>,
) -> Result<Vec<ClassificationResult>> {
    let shape = output.shape();
    let (batch, classes) = match shape.len() {
        1 => (1, shape[0]),
        2 => (shape[0], shape[1]),
        n => {
            return Err(anyhow::anyhow!(
                "Expected 1D or 2D classifier output, got {n}D with shape {shape:?}"
            ))
        }
    };

    let mut results = Vec::with_capacity(batch);
    for row in 0..batch {
        let scores: Vec<f32> = (0..classes)
            .map(|class_idx| {
                if shape.len() == 1 {
                    output[[class_idx]]
                } else {
                    output[[row, class_idx]]
                }
            })
            .collect();
        if scores.is_empty() {
            continue;
        }

        let probabilities = ensure_probabilities(&scores);
        let Some((best_idx, best_prob)) = probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        else {
            continue;
        };

        results.push(ClassificationResult {
            species: display_name(class_names, best_idx),
            confidence: best_prob,
        });
    }

    Ok(results)
}

/// Classifier exports usually bake softmax into the graph, but some emit raw
/// logits. Pass distributions through untouched; softmax everything else.
fn ensure_probabilities(scores: &[f32]) -> Vec<f32> {
    let sum: f32 = scores.iter().sum();
    let in_unit_range = scores.iter().all(|&v| (0.0..=1.0).contains(&v));
    if in_unit_range && (sum - 1.0).abs() <= 0.01 {
        scores.to_vec()
    } else {
        softmax(scores)
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|x| x / sum).collect()
}
