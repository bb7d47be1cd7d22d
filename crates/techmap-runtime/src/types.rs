//! Runtime types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use techmap_analyze::{FrequencyTable, TreemapLayout};
use techmap_extract::ExtractionWarning;

/// Output for one input title.
#[derive(Debug, Clone, Serialize)]
pub struct RowResult {
    pub title: String,
    /// Trimmed service output before normalization.
    #[serde(rename = "rawSuggestion")]
    pub raw_suggestion: String,
    /// Normalized, comma-separated keywords.
    pub keywords: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ExtractionWarning>,
}

/// A non-fatal warning tied to an input row (0-based).
#[derive(Debug, Clone, Serialize)]
pub struct RunWarning {
    pub row: usize,
    pub title: String,
    pub warning: ExtractionWarning,
}

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub rows: Vec<RowResult>,
    pub frequency: FrequencyTable,
    pub treemap: TreemapLayout,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    /// Warnings in row order.
    pub fn warnings(&self) -> Vec<RunWarning> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(row, r)| {
                r.warning.as_ref().map(|w| RunWarning {
                    row,
                    title: r.title.clone(),
                    warning: w.clone(),
                })
            })
            .collect()
    }

    /// Rows whose external call failed.
    pub fn failed_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.warning, Some(ExtractionWarning::CallFailed { .. })))
            .count()
    }

    /// False when there is nothing to draw.
    pub fn has_visualization(&self) -> bool {
        !self.treemap.is_empty()
    }
}

/// Short summary for logs and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    #[serde(rename = "failedRows")]
    pub failed_rows: usize,
    pub warnings: usize,
    pub technologies: usize,
    #[serde(rename = "treemapTiles")]
    pub treemap_tiles: usize,
}

impl From<&RunReport> for RunSummary {
    fn from(report: &RunReport) -> Self {
        Self {
            rows: report.rows.len(),
            failed_rows: report.failed_rows(),
            warnings: report.rows.iter().filter(|r| r.warning.is_some()).count(),
            technologies: report.frequency.len(),
            treemap_tiles: report.treemap.len(),
        }
    }
}
