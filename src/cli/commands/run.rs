//! Run command - start the bot

use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use crate::matrix::Bot;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Room to listen in (overrides matrix.room)
    #[arg(long)]
    pub room: Option<String>,
}

/// Execute the run command
pub async fn execute(
    args: RunArgs,
    mut config: Config,
    xdg: &XdgDirs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(room) = args.room {
        config.matrix.room = room;
    }
    config.validate_for_bot()?;

    xdg.log_paths();
    config.log_config();

    let services = Services::new(config)?;
    let records = services.catalog.len()?;
    if records == 0 {
        tracing::warn!("Catalog is empty; run `romfinder ingest <LINKLIST>` first");
    } else {
        tracing::info!("Catalog holds {} record(s)", records);
    }

    let mut bot = Bot::start(&services).await?;
    bot.run().await?;

    Ok(())
}
