//! Query-source trait and structured error types.
//!
//! The QuerySource trait abstracts over the analytical warehouse so the
//! pipeline can run against the production HTTP endpoint or a stub in tests.

use serde_json::Value;
use thiserror::Error;

/// A single result row: column name → JSON value, as returned by the source.
pub type Row = serde_json::Map<String, Value>;

/// Structured error types for warehouse access.
///
/// These are designed to be displayable in per-section console diagnostics.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("authentication rejected: {0}")]
    AuthenticationRejected(String),

    #[error("query failed: {0}")]
    QueryFailed(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("source error: {0}")]
    Other(String),
}

/// Trait for analytical query sources.
///
/// Implementations handle the specifics of executing one SQL statement and
/// returning its rows. Callers own per-section failure policy — a returned
/// error never aborts the run.
pub trait QuerySource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Execute one query and return its rows. Exactly one read per call.
    fn query(&self, sql: &str) -> Result<Vec<Row>, SourceError>;
}
