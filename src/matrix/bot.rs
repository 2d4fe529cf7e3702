//! Bot loop: login, then sync and dispatch until shutdown.

use crate::core::config::Config;
use crate::core::delivery::RoomId;
use crate::core::dispatch::{Dispatch, Dispatcher, EventFilter};
use crate::core::error::{Result, RomError};
use crate::core::services::Services;
use crate::matrix::client::MatrixClient;
use crate::matrix::events::SyncResponse;
use crate::matrix::session::TokenStore;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const MIN_BACKOFF: Duration = Duration::from_secs(2);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Restore the saved session or log in with the configured password
pub async fn connect(config: &Config) -> Result<MatrixClient> {
    let mut client = MatrixClient::new(
        &config.matrix.homeserver,
        Duration::from_secs(config.sync.request_timeout_sec),
    )?;
    let session_file = &config.sync.session_file;

    if let Some(session) = TokenStore::load_usable(session_file) {
        info!("Using saved session for {}", session.user_id.trim());
        client.restore(session)?;
        return Ok(client);
    }

    let session = client
        .login(&config.matrix.username, &config.matrix.password)
        .await?;
    info!("Logged in as {}", session.user_id);

    match session.save(session_file) {
        Ok(()) => info!("Saved session to {}", session_file.display()),
        Err(e) => warn!("Could not save session: {}", e),
    }

    Ok(client)
}

/// Long-running bot bound to one room
pub struct Bot {
    client: MatrixClient,
    dispatcher: Dispatcher,
    timeout_ms: u64,
}

impl Bot {
    pub fn new(client: MatrixClient, dispatcher: Dispatcher, timeout_ms: u64) -> Self {
        Self {
            client,
            dispatcher,
            timeout_ms,
        }
    }

    /// Connect and build a bot for the configured room
    pub async fn start(services: &Services) -> Result<Self> {
        let config = &services.config;
        config.validate_for_bot()?;

        let client = connect(config).await?;
        let own_user = client
            .user_id()
            .ok_or_else(|| RomError::Session("No user id after login".to_string()))?
            .to_string();

        let filter = EventFilter {
            own_user,
            room: RoomId::new(config.matrix.room.as_str()),
            started_at_ms: chrono::Utc::now().timestamp_millis(),
        };

        Ok(Self::new(
            client,
            services.dispatcher(filter),
            config.sync.timeout_ms,
        ))
    }

    /// Sync and handle commands until Ctrl+C or a session error
    pub async fn run(&mut self) -> Result<()> {
        info!("Bot is running in {}", self.dispatcher.filter().room);

        let mut shutdown = tokio::spawn(async {
            tokio::signal::ctrl_c().await.ok();
        });

        let mut since: Option<String> = None;
        let mut backoff = MIN_BACKOFF;

        loop {
            tokio::select! {
                synced = self.client.sync(since.as_deref(), self.timeout_ms) => {
                    match synced {
                        Ok(response) => {
                            backoff = MIN_BACKOFF;
                            since = Some(response.next_batch.clone());
                            self.process(&response).await;
                        }
                        Err(e @ RomError::Session(_)) => {
                            error!("Sync stopped: {}", e);
                            return Err(e);
                        }
                        Err(e) => {
                            warn!("Sync failed, retrying in {:?}: {}", backoff, e);
                            tokio::time::sleep(backoff).await;
                            backoff = (backoff * 2).min(MAX_BACKOFF);
                        }
                    }
                }

                _ = &mut shutdown => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        info!("Bot shutting down");
        Ok(())
    }

    /// Handle every message of one sync response, one at a time
    pub async fn process(&self, response: &SyncResponse) -> Vec<Dispatch> {
        let mut outcomes = Vec::new();
        for message in response.messages() {
            let outcome = self.dispatcher.handle(&message, &self.client).await;
            if !matches!(outcome, Dispatch::Ignored { .. }) {
                debug!("{}: {:?}", message.event_id, outcome);
            }
            outcomes.push(outcome);
        }
        outcomes
    }
}
