//! Farewatch CLI — refresh and export commands.
//!
//! Commands:
//! - `refresh` — run the pipeline and publish to the configured object store
//! - `export` — run the pipeline and write a local JSON document
//!
//! Both commands share the same pipeline; they differ only in sink
//! construction and console output. A section failure degrades that section
//! to its fallback; a publish failure exits non-zero.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use farewatch_core::WarehouseClient;
use farewatch_runner::{
    assemble, publish, LocalFileSink, ObjectStoreSink, PublishReceipt, RefreshConfig,
    RefreshProgress, SnapshotSink, StdoutProgress,
};

#[derive(Parser)]
#[command(
    name = "farewatch",
    about = "Farewatch CLI — ML dashboard snapshot refresh"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the dashboard document in the configured object store.
    Refresh {
        /// Path to a TOML config file.
        #[arg(long, default_value = "farewatch.toml")]
        config: PathBuf,

        /// Suppress per-section progress output.
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
    /// Run the pipeline and write the document to a local file.
    Export {
        /// Path to a TOML config file.
        #[arg(long, default_value = "farewatch.toml")]
        config: PathBuf,

        /// Output path for the JSON document.
        #[arg(long, default_value = "dashboard_data.json")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Refresh { config, quiet } => run_refresh(&config, quiet),
        Commands::Export { config, out } => run_export(&config, &out),
    }
}

fn run_refresh(config_path: &Path, quiet: bool) -> Result<()> {
    let config = RefreshConfig::from_file(config_path)?;
    let sink_config = match &config.sink {
        Some(sink_config) => sink_config,
        None => bail!(
            "config '{}' has no [sink] section (required for refresh; use `export` for a local file)",
            config_path.display()
        ),
    };

    let sink_token = std::env::var(&sink_config.token_env).ok();
    let sink = ObjectStoreSink::from_config(sink_config, sink_token);

    let receipt = run_pipeline(&config, &sink, quiet)?;
    print_receipt(&receipt);
    Ok(())
}

fn run_export(config_path: &Path, out: &Path) -> Result<()> {
    let config = RefreshConfig::from_file(config_path)?;
    let sink = LocalFileSink::new(out);

    let receipt = run_pipeline(&config, &sink, false)?;
    print_receipt(&receipt);
    Ok(())
}

/// Shared pipeline: assemble from the warehouse, publish through the sink.
fn run_pipeline(
    config: &RefreshConfig,
    sink: &dyn SnapshotSink,
    quiet: bool,
) -> Result<PublishReceipt> {
    let token = std::env::var(&config.warehouse.token_env).ok();
    let source = WarehouseClient::new(
        config.warehouse.endpoint.as_str(),
        config.warehouse.project_id.as_str(),
        token,
        config.warehouse.timeout_secs,
    );

    let progress = StdoutProgress;
    let progress_ref: Option<&dyn RefreshProgress> = if quiet { None } else { Some(&progress) };

    let snapshot = assemble(&source, config, progress_ref);

    // Publish failure is the run outcome; nothing catches it here.
    publish(&snapshot, sink).context("failed to publish snapshot")
}

fn print_receipt(receipt: &PublishReceipt) {
    println!();
    println!("{}", receipt.summary());
    println!("Destination: {}", receipt.destination);
    println!("Size: {} bytes", receipt.bytes_written);
    println!("Digest: {}", receipt.digest);
}
