//! CLI adapter for romfinder
//!
//! Provides the command-line entry points: running the bot, building the
//! catalog and searching it locally. This module is parallel to
//! `matrix/`; both depend on `core/`.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |     matrix/      |      |      cli/        |
//! | (chat adapter)   |<-----| (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// romfinder - catalog search bot
///
/// Answers `!roms <query>` in a Matrix room with matching catalog
/// entries. Quote phrases with ' or ", prefix a term with - to exclude it.
#[derive(Parser, Debug)]
#[command(name = "romfinder")]
#[command(version)]
#[command(about = "Chat-triggered catalog search bot", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Log format (logs go to stderr)
    #[arg(long, global = true, default_value = "text", env = "ROMFINDER_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and answer commands in the configured room
    Run(commands::RunArgs),

    /// Add a link list to the catalog
    Ingest(commands::IngestArgs),

    /// Search the catalog locally, as the bot would
    Search(commands::SearchArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  romfinder completions bash > ~/.local/share/bash-completion/completions/romfinder
    ///   zsh:   romfinder completions zsh > ~/.zfunc/_romfinder
    ///   fish:  romfinder completions fish > ~/.config/fish/completions/romfinder.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::xdg::{migrate_legacy_paths, XdgDirs};

    // Handle completions command early (doesn't need config)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;

    // Run migration from legacy paths (if needed)
    if let Err(e) = migrate_legacy_paths(&xdg) {
        output::print_warning(&format!("Migration issue: {e}"));
    }

    // Load configuration
    let config = Config::load_with_xdg(&xdg)?;

    // Execute command
    match cli.command {
        Commands::Run(args) => commands::run::execute(args, config, &xdg).await,
        Commands::Ingest(args) => commands::ingest::execute(args, config, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, config, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &config, &xdg, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
