//! Section identifiers and the per-section fetch outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::source::{Row, SourceError};

/// One named, independently-fetched subset of the dashboard snapshot.
///
/// Declaration order is the assembly order and matches the field order of
/// [`Snapshot`](crate::snapshot::Snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    ModelMetrics,
    FeatureImportance,
    PredictionQuality,
    PerformanceHistory,
    DriftHistory,
    Clusters,
    Alerts,
    TotalPredictions,
}

impl SectionId {
    /// All sections in assembly order.
    pub const ALL: [SectionId; 8] = [
        SectionId::ModelMetrics,
        SectionId::FeatureImportance,
        SectionId::PredictionQuality,
        SectionId::PerformanceHistory,
        SectionId::DriftHistory,
        SectionId::Clusters,
        SectionId::Alerts,
        SectionId::TotalPredictions,
    ];

    /// The snapshot field this section populates.
    pub fn field_name(&self) -> &'static str {
        match self {
            SectionId::ModelMetrics => "model_metrics",
            SectionId::FeatureImportance => "feature_importance",
            SectionId::PredictionQuality => "prediction_quality",
            SectionId::PerformanceHistory => "performance_history",
            SectionId::DriftHistory => "drift_history",
            SectionId::Clusters => "clusters",
            SectionId::Alerts => "alerts",
            SectionId::TotalPredictions => "total_predictions",
        }
    }

    /// Human-readable label for progress output.
    pub fn label(&self) -> &'static str {
        match self {
            SectionId::ModelMetrics => "model metrics",
            SectionId::FeatureImportance => "feature importance",
            SectionId::PredictionQuality => "prediction quality",
            SectionId::PerformanceHistory => "performance history",
            SectionId::DriftHistory => "drift monitoring",
            SectionId::Clusters => "cluster profiles",
            SectionId::Alerts => "alerts",
            SectionId::TotalPredictions => "total predictions",
        }
    }

    /// Position of this section in assembly order.
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Result of one section fetch: raw rows, or the swallowed source error.
///
/// Produced by the fetch layer and consumed immediately by the section's
/// normalizer; never shared across sections.
#[derive(Debug)]
pub enum FetchOutcome {
    Rows(Vec<Row>),
    Failed(SourceError),
}

impl FetchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    /// Number of rows fetched (zero for a failed fetch).
    pub fn row_count(&self) -> usize {
        match self {
            FetchOutcome::Rows(rows) => rows.len(),
            FetchOutcome::Failed(_) => 0,
        }
    }
}
