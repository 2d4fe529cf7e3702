//! Minimal Matrix client-server HTTP client.
//!
//! Provides a wrapper around reqwest with:
//! - Password login and token reuse
//! - `/sync` long-polling
//! - Idempotent event sends (one transaction id per send)

use crate::core::delivery::{ChatSender, EventId, OutgoingMessage, Reaction, RoomId};
use crate::core::error::{Result, RomError};
use crate::matrix::events::{
    ErrorBody, LoginRequest, LoginResponse, MessageContent, ReactionContent, SendResponse,
    SyncResponse, MESSAGE_EVENT, REACTION_EVENT,
};
use crate::matrix::session::TokenStore;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const API_PREFIX: &str = "/_matrix/client/v3";

/// Authenticated (or not yet authenticated) homeserver client
pub struct MatrixClient {
    http: Client,
    homeserver: String,
    session: Option<TokenStore>,
}

impl MatrixClient {
    /// Create a client for `homeserver` with a per-request timeout
    pub fn new(homeserver: &str, request_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("romfinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RomError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            homeserver: homeserver.trim_end_matches('/').to_string(),
            session: None,
        })
    }

    /// Use a previously saved session
    pub fn restore(&mut self, session: TokenStore) -> Result<()> {
        session.checked_user_id()?;
        self.session = Some(session);
        Ok(())
    }

    /// Log in with a password and keep the resulting session
    pub async fn login(&mut self, username: &str, password: &str) -> Result<TokenStore> {
        let url = self.url("/login");
        let response = self
            .http
            .post(&url)
            .json(&LoginRequest::password(username, password))
            .send()
            .await?;
        let login: LoginResponse = check(response, "login").await?.json().await?;

        let session = TokenStore {
            access_token: login.access_token,
            user_id: login.user_id,
            device_id: login.device_id,
        };
        session.checked_user_id()?;
        self.session = Some(session.clone());
        Ok(session)
    }

    /// The logged-in user id
    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.trim())
    }

    /// One long-poll `/sync` call
    pub async fn sync(&self, since: Option<&str>, timeout_ms: u64) -> Result<SyncResponse> {
        let mut url = format!("{}?timeout={timeout_ms}", self.url("/sync"));
        if let Some(since) = since {
            url.push_str("&since=");
            url.push_str(&urlencoding::encode(since));
        }

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.token()?)
            .send()
            .await?;
        Ok(check(response, "sync").await?.json().await?)
    }

    /// Send a room event and return its id
    pub async fn send_event<T: Serialize>(
        &self,
        room: &RoomId,
        event_type: &str,
        content: &T,
    ) -> Result<EventId> {
        let txn_id = Uuid::new_v4();
        let url = self.url(&format!(
            "/rooms/{}/send/{}/{}",
            urlencoding::encode(room.as_str()),
            event_type,
            txn_id
        ));

        let response = self
            .http
            .put(&url)
            .bearer_auth(self.token()?)
            .json(content)
            .send()
            .await?;
        let sent: SendResponse = check(response, "send").await?.json().await?;

        debug!("Sent {} {} to {}", event_type, sent.event_id, room);
        Ok(sent.event_id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.homeserver, API_PREFIX, path)
    }

    fn token(&self) -> Result<&str> {
        self.session
            .as_ref()
            .map(|s| s.access_token.as_str())
            .ok_or_else(|| RomError::Session("Not logged in".to_string()))
    }
}

/// Turn non-2xx responses into errors, keeping the Matrix errcode
async fn check(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match response.json::<ErrorBody>().await {
        Ok(body) if body.errcode == "M_UNKNOWN_TOKEN" => Err(RomError::Session(format!(
            "Access token rejected ({}); delete the session file to log in again",
            body.error
        ))),
        Ok(body) => Err(RomError::Transport(format!(
            "{what} failed with {status}: {} {}",
            body.errcode, body.error
        ))),
        Err(_) => Err(RomError::Transport(format!("{what} failed with {status}"))),
    }
}

#[async_trait]
impl ChatSender for MatrixClient {
    async fn send_reaction(&self, room: &RoomId, reaction: &Reaction) -> Result<EventId> {
        self.send_event(room, REACTION_EVENT, &ReactionContent::from(reaction))
            .await
            .map_err(|e| RomError::DeliverySend(e.to_string()))
    }

    async fn send_message(&self, room: &RoomId, message: &OutgoingMessage) -> Result<EventId> {
        self.send_event(room, MESSAGE_EVENT, &MessageContent::from(message))
            .await
            .map_err(|e| RomError::DeliverySend(e.to_string()))
    }
}
