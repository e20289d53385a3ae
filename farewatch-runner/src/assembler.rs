//! Snapshot assembly — the aggregation-with-fallback pipeline.
//!
//! Visits the eight sections in their fixed order, fetch → normalize →
//! attach. Each section is a bulkhead: its failure is converted to the
//! section's fallback and the remaining sections still run. One attempt
//! per section, no retry, strictly sequential. Sections may observe the
//! warehouse at slightly different moments; cross-section consistency is
//! not a goal.

use chrono::Local;

use farewatch_core::{normalize, FetchOutcome, QuerySource, SectionId, Snapshot};

use crate::config::RefreshConfig;
use crate::fetch::SectionFetcher;
use crate::queries::QueryCatalog;

/// Progress callbacks for per-section diagnostics.
pub trait RefreshProgress {
    /// Called before a section's query runs.
    fn on_section_start(&self, section: SectionId, index: usize, total: usize);

    /// Called with the raw outcome, before normalization.
    fn on_section_complete(&self, section: SectionId, outcome: &FetchOutcome);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl RefreshProgress for StdoutProgress {
    fn on_section_start(&self, section: SectionId, index: usize, total: usize) {
        println!("[{}/{}] Fetching {}...", index + 1, total, section.label());
    }

    fn on_section_complete(&self, section: SectionId, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Rows(rows) => println!("  OK: {} row(s)", rows.len()),
            FetchOutcome::Failed(e) => {
                println!("  FAIL: {e} (using {} fallback)", section.field_name())
            }
        }
    }
}

/// Assemble a fresh snapshot from the configured warehouse.
///
/// Always returns a complete, schema-valid snapshot: per-section failures
/// degrade to fallbacks, never to an error.
pub fn assemble(
    source: &dyn QuerySource,
    config: &RefreshConfig,
    progress: Option<&dyn RefreshProgress>,
) -> Snapshot {
    let generated_at = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    let catalog = QueryCatalog::new(
        config.warehouse.project_id.as_str(),
        config.warehouse.dataset.as_str(),
    );
    let fetcher = SectionFetcher::new(source, catalog);
    let total = SectionId::ALL.len();

    let run = |section: SectionId| -> FetchOutcome {
        if let Some(p) = progress {
            p.on_section_start(section, section.ordinal(), total);
        }
        let outcome = fetcher.fetch(section);
        if let Some(p) = progress {
            p.on_section_complete(section, &outcome);
        }
        outcome
    };

    // Field order is assembly order: sections run top to bottom.
    Snapshot {
        generated_at,
        project_id: config.warehouse.project_id.clone(),
        model_metrics: normalize::model_metrics(run(SectionId::ModelMetrics)),
        feature_importance: normalize::feature_importance(run(SectionId::FeatureImportance)),
        prediction_quality: normalize::prediction_quality(run(SectionId::PredictionQuality)),
        performance_history: normalize::performance_history(run(SectionId::PerformanceHistory)),
        drift_history: normalize::drift_history(run(SectionId::DriftHistory)),
        clusters: normalize::clusters(run(SectionId::Clusters)),
        alerts: normalize::alerts(run(SectionId::Alerts)),
        total_predictions: normalize::total_predictions(run(SectionId::TotalPredictions)),
    }
}
