//! Per-section normalization of raw warehouse rows.
//!
//! Maps loosely-typed rows into the canonical record shapes:
//! - metric fields coerced to `f64` (integers and numeric strings accepted)
//! - z-score-like optional fields: null → 0.0
//! - ordering enforced here, never trusted from the source
//! - a failed fetch, a malformed row, or zero rows where at least one is
//!   required, yields the section's fallback
//!
//! Rounding is the warehouse's responsibility and is not re-applied here.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde_json::Value;

use crate::fallback;
use crate::section::FetchOutcome;
use crate::snapshot::{
    Alert, ClusterProfile, DriftWindow, FeatureWeight, ModelMetrics, PerformanceDay, QualityBucket,
};
use crate::source::Row;

// ─── Value coercion ─────────────────────────────────────────────────

/// Numeric field: accepts floats, integers, and numeric strings.
fn num(row: &Row, field: &str) -> Option<f64> {
    match row.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Numeric field where the warehouse may hold NULL: missing/null → 0.0.
fn num_or_zero(row: &Row, field: &str) -> f64 {
    num(row, field).unwrap_or(0.0)
}

/// Count field: accepts integers, integral floats, and numeric strings.
fn int(row: &Row, field: &str) -> Option<i64> {
    match row.get(field)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn text(row: &Row, field: &str) -> Option<String> {
    match row.get(field)? {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Chronological comparison for CAST-AS-STRING dates. Non-ISO strings fall
/// back to lexicographic order.
fn date_cmp(a: &str, b: &str) -> Ordering {
    match (
        NaiveDate::parse_from_str(a, "%Y-%m-%d"),
        NaiveDate::parse_from_str(b, "%Y-%m-%d"),
    ) {
        (Ok(da), Ok(db)) => da.cmp(&db),
        _ => a.cmp(b),
    }
}

/// Map every row or give up: one malformed row degrades the whole section.
fn map_rows<T>(rows: &[Row], f: impl Fn(&Row) -> Option<T>) -> Option<Vec<T>> {
    rows.iter().map(f).collect()
}

// ─── Sections ───────────────────────────────────────────────────────

/// Evaluation output → the MAE/RMSE/R2 triple.
///
/// RMSE is derived from the mean squared error. The evaluation is expected
/// to yield exactly one row; zero rows degrade to the fallback.
pub fn model_metrics(outcome: FetchOutcome) -> ModelMetrics {
    let rows = match outcome {
        FetchOutcome::Rows(rows) => rows,
        FetchOutcome::Failed(_) => return fallback::model_metrics(),
    };
    let row = match rows.first() {
        Some(row) => row,
        None => return fallback::model_metrics(),
    };
    match (
        num(row, "mean_absolute_error"),
        num(row, "mean_squared_error"),
        num(row, "r2_score"),
    ) {
        (Some(mae), Some(mse), Some(r2)) => ModelMetrics {
            mae,
            rmse: mse.sqrt(),
            r2,
        },
        _ => fallback::model_metrics(),
    }
}

/// Feature importance, sorted by descending importance gain.
pub fn feature_importance(outcome: FetchOutcome) -> Vec<FeatureWeight> {
    let rows = match outcome {
        FetchOutcome::Rows(rows) => rows,
        FetchOutcome::Failed(_) => return fallback::feature_importance(),
    };
    let mut weights = match map_rows(&rows, |row| {
        Some(FeatureWeight {
            feature: text(row, "feature")?,
            importance: num(row, "importance")?,
        })
    }) {
        Some(weights) => weights,
        None => return fallback::feature_importance(),
    };
    weights.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    weights
}

/// Quality distribution, ordered Excellent, Good, Fair, then the rest.
///
/// `pct` is the warehouse's window aggregate over the full grouped result;
/// it is only type-coerced here, never recomputed.
pub fn prediction_quality(outcome: FetchOutcome) -> Vec<QualityBucket> {
    let rows = match outcome {
        FetchOutcome::Rows(rows) => rows,
        FetchOutcome::Failed(_) => return fallback::prediction_quality(),
    };
    let mut buckets = match map_rows(&rows, |row| {
        Some(QualityBucket {
            quality: text(row, "quality")?,
            count: int(row, "count")?,
            pct: num(row, "pct")?,
        })
    }) {
        Some(buckets) => buckets,
        None => return fallback::prediction_quality(),
    };
    buckets.sort_by_key(|b| quality_rank(&b.quality));
    buckets
}

fn quality_rank(quality: &str) -> u8 {
    match quality {
        "Excellent" => 0,
        "Good" => 1,
        "Fair" => 2,
        _ => 3,
    }
}

/// Daily performance tracking, chronological ascending.
pub fn performance_history(outcome: FetchOutcome) -> Vec<PerformanceDay> {
    let rows = match outcome {
        FetchOutcome::Rows(rows) => rows,
        FetchOutcome::Failed(_) => return fallback::performance_history(),
    };
    let mut days = match map_rows(&rows, |row| {
        Some(PerformanceDay {
            date: text(row, "date")?,
            daily_mae: num(row, "daily_mae")?,
            within_5_pct: num(row, "within_5_pct")?,
            num_predictions: int(row, "num_predictions")?,
        })
    }) {
        Some(days) => days,
        None => return fallback::performance_history(),
    };
    days.sort_by(|a, b| date_cmp(&a.date, &b.date));
    days
}

/// Drift-monitoring windows, chronological ascending. Null z-scores → 0.0.
pub fn drift_history(outcome: FetchOutcome) -> Vec<DriftWindow> {
    let rows = match outcome {
        FetchOutcome::Rows(rows) => rows,
        FetchOutcome::Failed(_) => return fallback::drift_history(),
    };
    let mut windows = match map_rows(&rows, |row| {
        Some(DriftWindow {
            date: text(row, "date")?,
            miles_zscore: num_or_zero(row, "miles_zscore"),
            fare_zscore: num_or_zero(row, "fare_zscore"),
            duration_zscore: num_or_zero(row, "duration_zscore"),
            drift_status: text(row, "drift_status")?,
        })
    }) {
        Some(windows) => windows,
        None => return fallback::drift_history(),
    };
    windows.sort_by(|a, b| date_cmp(&a.date, &b.date));
    windows
}

/// Segment profiles, ordered by cluster id. Null ratio fields → 0.0.
pub fn clusters(outcome: FetchOutcome) -> Vec<ClusterProfile> {
    let rows = match outcome {
        FetchOutcome::Rows(rows) => rows,
        FetchOutcome::Failed(_) => return fallback::clusters(),
    };
    let mut profiles = match map_rows(&rows, |row| {
        Some(ClusterProfile {
            cluster_id: int(row, "cluster_id")?,
            cluster_size: int(row, "cluster_size")?,
            avg_fare: num(row, "avg_fare")?,
            avg_miles: num(row, "avg_miles")?,
            airport_pct: num_or_zero(row, "airport_pct"),
            downtown_pct: num_or_zero(row, "downtown_pct"),
            night_pct: num_or_zero(row, "night_pct"),
        })
    }) {
        Some(profiles) => profiles,
        None => return fallback::clusters(),
    };
    profiles.sort_by_key(|c| c.cluster_id);
    profiles
}

/// Model-health alerts, newest first.
pub fn alerts(outcome: FetchOutcome) -> Vec<Alert> {
    let rows = match outcome {
        FetchOutcome::Rows(rows) => rows,
        FetchOutcome::Failed(_) => return fallback::alerts(),
    };
    let mut alerts = match map_rows(&rows, |row| {
        Some(Alert {
            alert_date: text(row, "alert_date")?,
            alert_type: text(row, "alert_type")?,
            severity: text(row, "severity")?,
            message: text(row, "message")?,
        })
    }) {
        Some(alerts) => alerts,
        None => return fallback::alerts(),
    };
    alerts.sort_by(|a, b| date_cmp(&b.alert_date, &a.alert_date));
    alerts
}

/// Total prediction count. Requires one row with a `total` column.
pub fn total_predictions(outcome: FetchOutcome) -> i64 {
    let rows = match outcome {
        FetchOutcome::Rows(rows) => rows,
        FetchOutcome::Failed(_) => return fallback::TOTAL_PREDICTIONS,
    };
    rows.first()
        .and_then(|row| int(row, "total"))
        .unwrap_or(fallback::TOTAL_PREDICTIONS)
}
