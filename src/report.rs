//! Tallying and JSON report types for trap analysis runs.
//!
//! The report printed to stdout is the program's machine-readable surface:
//! exactly one JSON document per run, either an [`AnalysisSummary`] or an
//! [`ErrorReport`]. Logs never go to stdout.

use indexmap::IndexMap;
use serde::Serialize;

use crate::taxonomy;

/// One classifier outcome: the top-1 species label and its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub species: String,
    pub confidence: f32,
}

/// A named count in the summary output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyEntry {
    pub name: String,
    pub count: u64,
}

/// Successful analysis payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    /// Number of classifications that passed the confidence threshold.
    pub total_insects: u64,
    /// Up to five species, ordered by count descending. Species with equal
    /// counts keep the order in which they were first seen.
    pub top5_species: Vec<TallyEntry>,
    /// Family counts in first-seen order.
    pub families: Vec<TallyEntry>,
}

/// Failure payload carrying a single human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: String,
}

/// The one JSON document a run prints to stdout.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisReport {
    Summary(AnalysisSummary),
    Error(ErrorReport),
}

impl AnalysisReport {
    /// Fold a pipeline result into the printable report.
    pub fn from_pipeline_result(result: anyhow::Result<AnalysisSummary>) -> Self {
        match result {
            Ok(summary) => AnalysisReport::Summary(summary),
            // {:#} flattens the error's context chain into one line, which is
            // all the error payload carries.
            Err(e) => AnalysisReport::Error(ErrorReport {
                error: format!("{e:#}"),
            }),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"failed to serialize report: {e}"}}"#))
    }
}

/// Tally accepted classifications into the summary payload.
///
/// A classification is accepted only when its confidence is strictly greater
/// than `confidence_threshold`. Species tallies also drive the family tallies,
/// so the three output fields always agree on the same accepted set.
pub fn summarize(results: &[ClassificationResult], confidence_threshold: f32) -> AnalysisSummary {
    let mut species_counts: IndexMap<String, u64> = IndexMap::new();
    let mut family_counts: IndexMap<String, u64> = IndexMap::new();

    for result in results {
        if result.confidence > confidence_threshold {
            *species_counts.entry(result.species.clone()).or_insert(0) += 1;
            let family = taxonomy::family_for(&result.species);
            *family_counts.entry(family.to_string()).or_insert(0) += 1;
        }
    }

    let total_insects = species_counts.values().sum();

    let mut top5_species: Vec<TallyEntry> = species_counts
        .iter()
        .map(|(name, &count)| TallyEntry {
            name: name.clone(),
            count,
        })
        .collect();
    // Stable sort: entries with equal counts keep insertion order.
    top5_species.sort_by(|a, b| b.count.cmp(&a.count));
    top5_species.truncate(5);

    let families = family_counts
        .iter()
        .map(|(name, &count)| TallyEntry {
            name: name.clone(),
            count,
        })
        .collect();

    AnalysisSummary {
        total_insects,
        top5_species,
        families,
    }
}
