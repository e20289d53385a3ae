//! Farewatch Core — snapshot document, section model, warehouse access, normalization.
//!
//! This crate contains the data half of the dashboard export pipeline:
//! - The snapshot wire document and its eight section record shapes
//! - Section identifiers with their fixed assembly order
//! - Per-section static fallback values
//! - The query-source trait and the HTTP warehouse client
//! - Normalization from raw rows to canonical records

pub mod fallback;
pub mod normalize;
pub mod section;
pub mod snapshot;
pub mod source;
pub mod warehouse;

pub use section::{FetchOutcome, SectionId};
pub use snapshot::{
    Alert, ClusterProfile, DriftWindow, FeatureWeight, ModelMetrics, PerformanceDay,
    QualityBucket, Snapshot,
};
pub use source::{QuerySource, Row, SourceError};
pub use warehouse::WarehouseClient;
