//! The published snapshot document and its section record shapes.
//!
//! The serialized form of [`Snapshot`] is the wire contract with dashboard
//! consumers: field names and struct declaration order must stay stable
//! across runs. Every section field is always present — a degraded section
//! carries its fallback value, never a hole in the schema.
//!
//! Metric fields are `f64` even where the warehouse returns integers;
//! count-like fields (`count`, `num_predictions`, `cluster_size`,
//! `total_predictions`) stay integral.

use serde::{Deserialize, Serialize};

/// Evaluation metrics for the production fare model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    #[serde(rename = "MAE")]
    pub mae: f64,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    #[serde(rename = "R2")]
    pub r2: f64,
}

/// One feature with its importance gain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub importance: f64,
}

/// One prediction-quality bucket with its share of all predictions.
///
/// `pct` is a window aggregate computed by the warehouse over the full
/// grouped result; it is never recomputed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityBucket {
    pub quality: String,
    pub count: i64,
    pub pct: f64,
}

/// One day of rolling performance tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceDay {
    pub date: String,
    pub daily_mae: f64,
    pub within_5_pct: f64,
    pub num_predictions: i64,
}

/// One drift-monitoring window. Z-scores default to 0.0 when the warehouse
/// has no value for the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftWindow {
    pub date: String,
    pub miles_zscore: f64,
    pub fare_zscore: f64,
    pub duration_zscore: f64,
    pub drift_status: String,
}

/// Aggregated profile of one rider segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub cluster_id: i64,
    pub cluster_size: i64,
    pub avg_fare: f64,
    pub avg_miles: f64,
    pub airport_pct: f64,
    pub downtown_pct: f64,
    pub night_pct: f64,
}

/// One model-health alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub alert_date: String,
    pub alert_type: String,
    pub severity: String,
    pub message: String,
}

/// The complete merged dashboard document published each run.
///
/// Created fresh on every run, immutable once handed to the publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// ISO-8601 stamp taken at assembly start.
    pub generated_at: String,
    /// Tenant identifier for the data source.
    pub project_id: String,
    pub model_metrics: ModelMetrics,
    pub feature_importance: Vec<FeatureWeight>,
    pub prediction_quality: Vec<QualityBucket>,
    pub performance_history: Vec<PerformanceDay>,
    pub drift_history: Vec<DriftWindow>,
    pub clusters: Vec<ClusterProfile>,
    pub alerts: Vec<Alert>,
    pub total_predictions: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            generated_at: "2025-06-01T04:00:00.000000".into(),
            project_id: "demo-project".into(),
            model_metrics: ModelMetrics {
                mae: 2.84,
                rmse: 3.61,
                r2: 0.921,
            },
            feature_importance: vec![
                FeatureWeight {
                    feature: "trip_miles".into(),
                    importance: 0.452,
                },
                FeatureWeight {
                    feature: "trip_seconds".into(),
                    importance: 0.213,
                },
            ],
            prediction_quality: vec![QualityBucket {
                quality: "Excellent".into(),
                count: 681_439,
                pct: 47.8,
            }],
            performance_history: vec![PerformanceDay {
                date: "2025-05-30".into(),
                daily_mae: 2.91,
                within_5_pct: 84.2,
                num_predictions: 70_214,
            }],
            drift_history: vec![DriftWindow {
                date: "2025-05-30".into(),
                miles_zscore: 0.114,
                fare_zscore: 0.102,
                duration_zscore: 0.087,
                drift_status: "OK".into(),
            }],
            clusters: vec![ClusterProfile {
                cluster_id: 1,
                cluster_size: 1_234,
                avg_fare: 15.23,
                avg_miles: 2.8,
                airport_pct: 3.2,
                downtown_pct: 25.6,
                night_pct: 32.5,
            }],
            alerts: vec![Alert {
                alert_date: "2025-05-29".into(),
                alert_type: "drift".into(),
                severity: "warning".into(),
                message: "fare_zscore above threshold".into(),
            }],
            total_predictions: 2_119_688,
        }
    }

    #[test]
    fn json_roundtrip() {
        let original = sample_snapshot();
        let json = serde_json::to_string_pretty(&original).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn model_metrics_field_spelling() {
        let json = serde_json::to_string(&sample_snapshot().model_metrics).unwrap();
        assert!(json.contains("\"MAE\""));
        assert!(json.contains("\"RMSE\""));
        assert!(json.contains("\"R2\""));
        assert!(!json.contains("\"mae\""));
    }

    #[test]
    fn top_level_field_order_is_stable() {
        let json = serde_json::to_string(&sample_snapshot()).unwrap();
        let expected = [
            "generated_at",
            "project_id",
            "model_metrics",
            "feature_importance",
            "prediction_quality",
            "performance_history",
            "drift_history",
            "clusters",
            "alerts",
            "total_predictions",
        ];
        let positions: Vec<usize> = expected
            .iter()
            .map(|f| json.find(&format!("\"{f}\"")).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "field order changed: {json}");

        // exactly these fields, nothing else
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_object().unwrap().len(), expected.len());
    }

    #[test]
    fn fallback_document_is_schema_valid() {
        let snapshot = Snapshot {
            generated_at: "2025-06-01T04:00:00.000000".into(),
            project_id: "demo-project".into(),
            model_metrics: fallback::model_metrics(),
            feature_importance: fallback::feature_importance(),
            prediction_quality: fallback::prediction_quality(),
            performance_history: fallback::performance_history(),
            drift_history: fallback::drift_history(),
            clusters: fallback::clusters(),
            alerts: fallback::alerts(),
            total_predictions: fallback::TOTAL_PREDICTIONS,
        };
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["alerts"], serde_json::json!([]));
        assert_eq!(value["total_predictions"], serde_json::json!(0));
        assert_eq!(value["model_metrics"]["MAE"], serde_json::json!(3.12));
    }
}
