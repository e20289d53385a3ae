//! Farewatch Runner — refresh orchestration, query catalog, publishing, configuration.
//!
//! This crate builds on `farewatch-core` to provide:
//! - The section fetch loop with per-section bulkhead isolation
//! - The query catalog templating the eight section queries
//! - Publishing through object-store or local-file sinks
//! - TOML configuration for warehouse and sink

pub mod assembler;
pub mod config;
pub mod fetch;
pub mod publish;
pub mod queries;

pub use assembler::{assemble, RefreshProgress, StdoutProgress};
pub use config::{ConfigError, RefreshConfig, SinkConfig, WarehouseConfig};
pub use fetch::SectionFetcher;
pub use publish::{
    publish, LocalFileSink, ObjectStoreSink, PublishError, PublishReceipt, SinkError,
    SnapshotSink,
};
pub use queries::QueryCatalog;
