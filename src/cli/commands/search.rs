//! Search command - query the catalog locally

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::types::CatalogRecord;
use clap::Args;
use serde::Serialize;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query text, parsed exactly like the chat command
    /// (e.g. `'"super mario" -demo'`)
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub query: Vec<String>,

    /// Result ceiling (overrides search.max_results)
    #[arg(long, short = 'm')]
    pub max_results: Option<usize>,

    /// Print download URLs
    #[arg(long, short = 'u')]
    pub urls: bool,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub total_matches: usize,
    pub max_results: usize,
    pub overflow: bool,
    pub results: Vec<CatalogRecord>,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(max) = args.max_results {
        if max == 0 {
            return Err("--max-results must be at least 1.".into());
        }
        config.search.max_results = max;
    }

    let query = args.query.join(" ");
    let max_results = config.search.max_results;
    let services = Services::new(config)?;
    let results = services.search(&query)?;

    let overflow = results.exceeds(max_results);
    let output = SearchOutput {
        query,
        total_matches: results.total_matches,
        max_results,
        overflow,
        results: if overflow { Vec::new() } else { results.records },
    };

    match format {
        OutputFormat::Human => {
            if output.overflow {
                println!(
                    "{}: {}",
                    colors::warning("Too many results"),
                    colors::number(&output.total_matches.to_string())
                );
            } else if output.results.is_empty() {
                println!("No results found for '{}'", colors::label(&output.query));
            } else {
                for record in &output.results {
                    println!(
                        "{} - {} - {}",
                        record.section,
                        record.console,
                        colors::file_path(&record.file)
                    );
                    if args.urls {
                        println!("    {}", colors::dim(&record.url));
                    }
                }
                println!(
                    "\n{} result(s)",
                    colors::number(&output.results.len().to_string())
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
