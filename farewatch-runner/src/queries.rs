//! The eight section queries, templated over project and dataset.
//!
//! SQL text lives only here; the rest of the pipeline sees opaque strings.
//! The warehouse does its own rounding — downstream normalization never
//! re-rounds.

use farewatch_core::SectionId;

/// Builds the per-section SQL for one tenant.
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    project_id: String,
    dataset: String,
}

impl QueryCatalog {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    /// Fully-qualified reference to a table or model in the tenant dataset.
    fn qualified(&self, name: &str) -> String {
        format!("`{}.{}.{}`", self.project_id, self.dataset, name)
    }

    /// The query for one section.
    pub fn sql(&self, section: SectionId) -> String {
        match section {
            SectionId::ModelMetrics => format!(
                r#"
SELECT *
FROM ML.EVALUATE(MODEL {model})
"#,
                model = self.qualified("fare_predictor_xgb")
            ),
            SectionId::FeatureImportance => format!(
                r#"
SELECT feature, ROUND(importance_gain, 4) AS importance
FROM ML.FEATURE_IMPORTANCE(MODEL {model})
ORDER BY importance_gain DESC
LIMIT 10
"#,
                model = self.qualified("fare_predictor_xgb")
            ),
            // pct must stay a window aggregate over the full grouped result;
            // recomputing it per bucket drifts from the published numbers.
            SectionId::PredictionQuality => format!(
                r#"
SELECT prediction_quality AS quality, COUNT(*) AS count,
    ROUND(COUNT(*) * 100.0 / SUM(COUNT(*)) OVER(), 1) AS pct
FROM {table}
GROUP BY prediction_quality
ORDER BY CASE prediction_quality
    WHEN 'Excellent' THEN 1 WHEN 'Good' THEN 2
    WHEN 'Fair' THEN 3 ELSE 4 END
"#,
                table = self.qualified("fare_predictions")
            ),
            SectionId::PerformanceHistory => format!(
                r#"
SELECT CAST(prediction_date AS STRING) AS date,
    ROUND(daily_mae, 3) AS daily_mae,
    ROUND(within_5_dollars_pct, 1) AS within_5_pct,
    num_predictions
FROM {table}
ORDER BY prediction_date DESC
LIMIT 30
"#,
                table = self.qualified("performance_tracking")
            ),
            SectionId::DriftHistory => format!(
                r#"
SELECT CAST(window_date AS STRING) AS date,
    ROUND(miles_zscore, 3) AS miles_zscore,
    ROUND(fare_zscore, 3) AS fare_zscore,
    ROUND(duration_zscore, 3) AS duration_zscore,
    drift_status
FROM {table}
ORDER BY window_date DESC
LIMIT 30
"#,
                table = self.qualified("drift_monitoring")
            ),
            SectionId::Clusters => format!(
                r#"
SELECT CENTROID_ID AS cluster_id, COUNT(*) AS cluster_size,
    ROUND(AVG(avg_fare), 2) AS avg_fare,
    ROUND(AVG(avg_miles), 2) AS avg_miles,
    ROUND(AVG(airport_ratio) * 100, 1) AS airport_pct,
    ROUND(AVG(downtown_ratio) * 100, 1) AS downtown_pct,
    ROUND(AVG(late_night_ratio) * 100, 1) AS night_pct
FROM ML.PREDICT(MODEL {model},
    (SELECT * FROM {table}))
GROUP BY CENTROID_ID
ORDER BY cluster_id
"#,
                model = self.qualified("taxi_segments_kmeans"),
                table = self.qualified("taxi_profiles")
            ),
            SectionId::Alerts => format!(
                r#"
SELECT CAST(alert_date AS STRING) AS alert_date,
    alert_type, severity, message
FROM {table}
ORDER BY alert_date DESC
LIMIT 20
"#,
                table = self.qualified("model_health_alerts")
            ),
            SectionId::TotalPredictions => format!(
                "SELECT COUNT(*) AS total FROM {table}",
                table = self.qualified("fare_predictions")
            ),
        }
    }
}
