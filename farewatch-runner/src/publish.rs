//! Snapshot serialization and sink publishing.
//!
//! The publisher serializes once and writes through a sink strategy —
//! object store for scheduled refreshes, local file for manual exports.
//! Consumers must never observe a partial document: the object-store write
//! is a single PUT, the file sink writes a temp file and renames it into
//! place. Publish failures are fatal for the run and propagate.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use thiserror::Error;

use farewatch_core::Snapshot;

use crate::config::SinkConfig;

/// Errors from a sink write.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("authentication rejected: {0}")]
    AuthenticationRejected(String),

    #[error("write rejected: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Errors from publishing. Never caught inside the pipeline.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Destination strategy for the published document.
pub trait SnapshotSink {
    /// Destination description for receipts and console output.
    fn describe(&self) -> String;

    /// Write the full document in one consumer-visible atomic operation.
    fn write(&self, bytes: &[u8]) -> Result<(), SinkError>;
}

// ─── Object store ───────────────────────────────────────────────────

/// Object-store sink: one HTTP PUT with content type and cache hint.
pub struct ObjectStoreSink {
    client: reqwest::blocking::Client,
    endpoint: String,
    bucket: String,
    object: String,
    cache_control: Option<String>,
    token: Option<String>,
}

impl ObjectStoreSink {
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        object: impl Into<String>,
        cache_control: Option<String>,
        token: Option<String>,
    ) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            object: object.into(),
            cache_control,
            token,
        }
    }

    /// Build a sink from the `[sink]` config section.
    pub fn from_config(config: &SinkConfig, token: Option<String>) -> Self {
        Self::new(
            config.endpoint.as_str(),
            config.bucket.as_str(),
            config.object.as_str(),
            Some(config.cache_control.clone()),
            token,
        )
    }

    fn object_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            self.object
        )
    }
}

impl SnapshotSink for ObjectStoreSink {
    fn describe(&self) -> String {
        self.object_url()
    }

    fn write(&self, bytes: &[u8]) -> Result<(), SinkError> {
        let mut req = self
            .client
            .put(self.object_url())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(bytes.to_vec());
        if let Some(cache_control) = &self.cache_control {
            req = req.header(reqwest::header::CACHE_CONTROL, cache_control.as_str());
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .map_err(|e| SinkError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(SinkError::AuthenticationRejected(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let body: String = resp.text().unwrap_or_default().chars().take(200).collect();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

// ─── Local file ─────────────────────────────────────────────────────

/// Local-file sink: temp file + rename, so readers never see a partial
/// document. No cache hint applies.
pub struct LocalFileSink {
    path: PathBuf,
}

impl LocalFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSink for LocalFileSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&self, bytes: &[u8]) -> Result<(), SinkError> {
        let io_err = |source: std::io::Error| SinkError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let tmp = tmp_path(&self.path);
        fs::write(&tmp, bytes).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "snapshot".into());
    name.push(".tmp");
    path.with_file_name(name)
}

// ─── Publisher ──────────────────────────────────────────────────────

/// Receipt for a published snapshot.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    /// ISO-8601 stamp taken when the write completed.
    pub completed_at: String,
    pub destination: String,
    pub bytes_written: usize,
    pub total_predictions: i64,
    /// BLAKE3 digest of the published bytes.
    pub digest: String,
}

impl PublishReceipt {
    /// Human-readable run outcome.
    pub fn summary(&self) -> String {
        format!(
            "Dashboard refreshed at {} with {} predictions",
            self.completed_at,
            group_digits(self.total_predictions)
        )
    }
}

/// Serialize a snapshot and write it through the given sink.
///
/// Failure here is fatal for the run: nothing degrades to a fallback and
/// there is no partial-publish retry.
pub fn publish(
    snapshot: &Snapshot,
    sink: &dyn SnapshotSink,
) -> Result<PublishReceipt, PublishError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    let bytes = json.into_bytes();
    sink.write(&bytes)?;

    Ok(PublishReceipt {
        completed_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        destination: sink.describe(),
        bytes_written: bytes.len(),
        total_predictions: snapshot.total_predictions,
        digest: blake3::hash(&bytes).to_hex().to_string(),
    })
}

/// Thousands-separated rendering of a count.
fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farewatch_core::fallback;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            generated_at: "2025-06-01T04:00:00.000000".into(),
            project_id: "demo-project".into(),
            model_metrics: fallback::model_metrics(),
            feature_importance: fallback::feature_importance(),
            prediction_quality: fallback::prediction_quality(),
            performance_history: fallback::performance_history(),
            drift_history: fallback::drift_history(),
            clusters: fallback::clusters(),
            alerts: fallback::alerts(),
            total_predictions: 2_119_688,
        }
    }

    // ─── Local file sink ────────────────────────────────────────────

    #[test]
    fn local_file_publish_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard_data.json");
        let snapshot = sample_snapshot();

        let receipt = publish(&snapshot, &LocalFileSink::new(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let restored: Snapshot = serde_json::from_str(&written).unwrap();
        assert_eq!(restored, snapshot);
        assert_eq!(receipt.bytes_written, written.len());
        assert_eq!(receipt.digest, blake3::hash(written.as_bytes()).to_hex().to_string());
        assert_eq!(receipt.destination, path.display().to_string());
    }

    #[test]
    fn local_file_sink_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard_data.json");
        publish(&sample_snapshot(), &LocalFileSink::new(&path)).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["dashboard_data.json".to_string()]);
    }

    #[test]
    fn local_file_sink_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports/daily/dashboard_data.json");
        publish(&sample_snapshot(), &LocalFileSink::new(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn published_document_is_two_space_indented() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard_data.json");
        publish(&sample_snapshot(), &LocalFileSink::new(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"generated_at\""));
    }

    // ─── Failing sink ───────────────────────────────────────────────

    struct RejectingSink;

    impl SnapshotSink for RejectingSink {
        fn describe(&self) -> String {
            "rejecting://sink".into()
        }

        fn write(&self, _bytes: &[u8]) -> Result<(), SinkError> {
            Err(SinkError::Rejected {
                status: 507,
                body: "quota exceeded".into(),
            })
        }
    }

    #[test]
    fn sink_failure_propagates() {
        let err = publish(&sample_snapshot(), &RejectingSink).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("507"));
        assert!(msg.contains("quota exceeded"));
    }

    // ─── Object store sink ──────────────────────────────────────────

    #[test]
    fn object_url_joins_endpoint_bucket_object() {
        let sink = ObjectStoreSink::new(
            "https://storage.example.com/",
            "demo-project-ml-dashboard",
            "dashboard_data.json",
            Some("no-cache, max-age=300".into()),
            None,
        );
        assert_eq!(
            sink.describe(),
            "https://storage.example.com/demo-project-ml-dashboard/dashboard_data.json"
        );
    }

    #[test]
    fn object_store_from_config_carries_cache_hint() {
        let config = SinkConfig {
            endpoint: "https://storage.example.com".into(),
            bucket: "b".into(),
            object: "o.json".into(),
            cache_control: "max-age=60".into(),
            token_env: "T".into(),
        };
        let sink = ObjectStoreSink::from_config(&config, Some("secret".into()));
        assert_eq!(sink.cache_control.as_deref(), Some("max-age=60"));
        assert_eq!(sink.describe(), "https://storage.example.com/b/o.json");
    }

    // ─── Receipt ────────────────────────────────────────────────────

    #[test]
    fn receipt_summary_formats_thousands() {
        let receipt = PublishReceipt {
            completed_at: "2025-06-01T04:00:01.000000".into(),
            destination: "out.json".into(),
            bytes_written: 1024,
            total_predictions: 2_119_688,
            digest: "abc".into(),
        };
        let summary = receipt.summary();
        assert!(summary.contains("2025-06-01T04:00:01.000000"));
        assert!(summary.contains("2,119,688 predictions"));
    }

    #[test]
    fn group_digits_edges() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1_000), "1,000");
        assert_eq!(group_digits(2_119_688), "2,119,688");
        assert_eq!(group_digits(-1_234), "-1,234");
    }

    // ─── Degraded run, end to end ───────────────────────────────────

    struct DownSource;

    impl farewatch_core::QuerySource for DownSource {
        fn name(&self) -> &str {
            "down"
        }

        fn query(
            &self,
            _sql: &str,
        ) -> Result<Vec<farewatch_core::Row>, farewatch_core::SourceError> {
            Err(farewatch_core::SourceError::NetworkUnreachable(
                "refused".into(),
            ))
        }
    }

    #[test]
    fn all_sections_down_still_publishes_schema_valid_document() {
        let config = crate::config::RefreshConfig::from_toml(
            r#"
[warehouse]
project_id = "demo-project"
dataset = "fare_analytics"
endpoint = "https://warehouse.example.com"
"#,
        )
        .unwrap();

        let snapshot = crate::assembler::assemble(&DownSource, &config, None);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard_data.json");
        let receipt = publish(&snapshot, &LocalFileSink::new(&path)).unwrap();
        assert_eq!(receipt.total_predictions, 0);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        for section in farewatch_core::SectionId::ALL {
            assert!(value.get(section.field_name()).is_some());
        }
        assert_eq!(value["total_predictions"], serde_json::json!(0));
        assert_eq!(value["model_metrics"]["MAE"], serde_json::json!(3.12));
    }

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/tmp/out/dashboard_data.json")),
            PathBuf::from("/tmp/out/dashboard_data.json.tmp")
        );
    }
}
