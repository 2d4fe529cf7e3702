//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show the password instead of a placeholder
    #[arg(long)]
    pub show_secrets: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub data_dir: String,
    pub state_dir: String,
    pub config: Config,
}

const REDACTED: &str = "********";

/// Execute the config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut shown = config.clone();
    if !args.show_secrets && !shown.matrix.password.is_empty() {
        shown.matrix.password = REDACTED.to_string();
    }

    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        data_dir: xdg.data_dir.to_string_lossy().into_owned(),
        state_dir: xdg.state_dir.to_string_lossy().into_owned(),
        config: shown,
    };

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  config_file: {}", response.config_file);
            println!("  data_dir: {}", response.data_dir);
            println!("  state_dir: {}", response.state_dir);
            println!();
            print!("{}", toml::to_string_pretty(&response.config)?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
