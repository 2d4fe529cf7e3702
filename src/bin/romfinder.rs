//! romfinder - chat-triggered catalog search bot
//!
//! # Examples
//!
//! ```bash
//! # Build the catalog from a link list
//! romfinder ingest links.txt
//!
//! # Try a query locally
//! romfinder search '"super mario" -demo'
//!
//! # Start the bot
//! romfinder run
//! ```

use clap::Parser;
use romfinder::cli::output::print_error;
use romfinder::cli::{run, Cli, LogFormat};
use tracing_subscriber::EnvFilter;

fn init_logging(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("romfinder=info"));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr) // stdout is reserved for command output
        .with_env_filter(filter);

    match format {
        LogFormat::Text => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
