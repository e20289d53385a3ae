//! Per-section static fallback values.
//!
//! The dashboard must always render a complete, schema-valid document even
//! when a source is degraded, so every section has a hardcoded substitute.
//! The model-metrics triple is the last reviewed evaluation of the
//! production model; list sections degrade to empty, the prediction count
//! to zero.

use crate::snapshot::{
    Alert, ClusterProfile, DriftWindow, FeatureWeight, ModelMetrics, PerformanceDay, QualityBucket,
};

/// Fallback prediction count.
pub const TOTAL_PREDICTIONS: i64 = 0;

/// Fallback evaluation metrics.
pub fn model_metrics() -> ModelMetrics {
    ModelMetrics {
        mae: 3.12,
        rmse: 3.96,
        r2: 0.913,
    }
}

pub fn feature_importance() -> Vec<FeatureWeight> {
    Vec::new()
}

pub fn prediction_quality() -> Vec<QualityBucket> {
    Vec::new()
}

pub fn performance_history() -> Vec<PerformanceDay> {
    Vec::new()
}

pub fn drift_history() -> Vec<DriftWindow> {
    Vec::new()
}

pub fn clusters() -> Vec<ClusterProfile> {
    Vec::new()
}

pub fn alerts() -> Vec<Alert> {
    Vec::new()
}
