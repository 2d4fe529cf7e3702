//! Ingest command - build the catalog from a link list

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Newline-separated list of download URLs
    pub linklist: PathBuf,

    /// Catalog database to write (overrides catalog.db_path)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// URL prefix every accepted line must start with
    #[arg(long)]
    pub prefix: Option<String>,
}

/// Ingest result response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub linklist: String,
    pub catalog: String,
    pub inserted: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub total_records: usize,
    pub duration_secs: f64,
}

/// Execute the ingest command
pub async fn execute(
    args: IngestArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.linklist.is_file() {
        return Err(format!(
            "Link list '{}' does not exist or is not a file.",
            args.linklist.display()
        )
        .into());
    }

    if let Some(db) = args.db {
        config.catalog.db_path = db;
    }
    if let Some(prefix) = args.prefix {
        if prefix.is_empty() {
            return Err("URL prefix cannot be empty.".into());
        }
        config.ingest.url_prefix = prefix;
    }

    let catalog_path = config.catalog.db_path.display().to_string();
    let services = Services::new(config)?;

    let linklist = args.linklist.clone();
    let worker = services.clone();
    let stats = tokio::task::spawn_blocking(move || worker.ingest(&linklist)).await??;

    let response = IngestResponse {
        linklist: args.linklist.display().to_string(),
        catalog: catalog_path,
        inserted: stats.inserted,
        duplicates: stats.duplicates,
        skipped: stats.skipped,
        total_records: services.catalog.len()?,
        duration_secs: stats.duration_ms as f64 / 1000.0,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {}",
                colors::success("Ingested"),
                colors::file_path(&response.linklist)
            );
            println!(
                "  {} inserted, {} duplicate(s), {} skipped in {}",
                colors::number(&response.inserted.to_string()),
                colors::number(&response.duplicates.to_string()),
                colors::number(&response.skipped.to_string()),
                format_duration(response.duration_secs)
            );
            println!(
                "  {} now holds {} record(s)",
                colors::file_path(&response.catalog),
                colors::number(&response.total_records.to_string())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
