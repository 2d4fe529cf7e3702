//! Command dispatch.
//!
//! Decides whether an incoming room message is a command for this bot
//! and, if so, runs it through parse, compile, execute and deliver.

use crate::core::delivery::{
    ChatSender, DeliveryContext, DeliveryEngine, DeliveryOutcome, EventId, OutgoingMessage,
    PlainNotice, RoomId,
};
use crate::core::error::RomError;
use crate::core::search::{compile_filter, parse_terms, CatalogExecutor};
use serde::Serialize;
use std::sync::Arc;

/// Message type that may carry a command
pub const TEXT_MSGTYPE: &str = "m.text";

/// A text event as seen by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub event_id: EventId,
    pub room: RoomId,
    pub sender: String,
    pub body: String,
    pub msgtype: String,
    /// Server timestamp in milliseconds since the epoch
    pub timestamp_ms: i64,
}

/// Which events the bot listens to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub own_user: String,
    pub room: RoomId,
    pub started_at_ms: i64,
}

/// Why an event was not handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    OwnMessage,
    OtherRoom,
    BeforeStart,
    NotText,
    NotCommand,
}

impl EventFilter {
    /// Check an event against the filter
    pub fn check(&self, msg: &IncomingMessage) -> Result<(), IgnoreReason> {
        if msg.sender == self.own_user {
            return Err(IgnoreReason::OwnMessage);
        }
        if msg.room != self.room {
            return Err(IgnoreReason::OtherRoom);
        }
        if msg.timestamp_ms < self.started_at_ms {
            return Err(IgnoreReason::BeforeStart);
        }
        if msg.msgtype != TEXT_MSGTYPE {
            return Err(IgnoreReason::NotText);
        }
        Ok(())
    }
}

/// Extract the query text if `body` invokes `command`.
///
/// The body must start with the command as its own whitespace-separated
/// word. The rest, trimmed, is the query (possibly empty).
///
/// ```
/// use romfinder::core::dispatch::parse_command;
///
/// assert_eq!(parse_command("!roms  mario kart ", "!roms"), Some("mario kart"));
/// assert_eq!(parse_command("!romsx mario", "!roms"), None);
/// ```
pub fn parse_command<'a>(body: &'a str, command: &str) -> Option<&'a str> {
    if !body.starts_with('!') {
        return None;
    }
    match body.split_whitespace().next() {
        Some(word) if word == command => Some(body[command.len()..].trim()),
        _ => None,
    }
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Dispatch {
    Ignored { reason: IgnoreReason },
    Delivered { delivery: DeliveryOutcome },
    QueryFailed { error: String },
}

/// Runs recognised commands end to end
pub struct Dispatcher {
    executor: Arc<CatalogExecutor>,
    engine: DeliveryEngine,
    command: String,
    filter: EventFilter,
}

impl Dispatcher {
    pub fn new(
        executor: Arc<CatalogExecutor>,
        engine: DeliveryEngine,
        command: impl Into<String>,
        filter: EventFilter,
    ) -> Self {
        Self {
            executor,
            engine,
            command: command.into(),
            filter,
        }
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Handle one event to completion
    pub async fn handle(&self, msg: &IncomingMessage, sender: &dyn ChatSender) -> Dispatch {
        if let Err(reason) = self.filter.check(msg) {
            tracing::trace!("Ignoring {}: {:?}", msg.event_id, reason);
            return Dispatch::Ignored { reason };
        }

        let Some(query) = parse_command(&msg.body, &self.command) else {
            return Dispatch::Ignored {
                reason: IgnoreReason::NotCommand,
            };
        };

        tracing::info!("Query from {}: {:?}", msg.sender, query);

        let parsed = parse_terms(query);
        tracing::debug!("Parsed terms: {:?}", parsed.terms());

        let spec = compile_filter(&parsed.positives, &parsed.negatives, self.engine.max_results());
        if spec.is_unfiltered() {
            tracing::debug!("No terms; matching the whole catalog");
        }

        let executor = Arc::clone(&self.executor);
        let search = tokio::task::spawn_blocking(move || executor.execute(&spec))
            .await
            .unwrap_or_else(|e| Err(RomError::QueryError(format!("Search task failed: {e}"))));

        let results = match search {
            Ok(results) => results,
            Err(e) => {
                tracing::error!("Search failed for {:?}: {}", query, e);
                let notice = OutgoingMessage::PlainNotice(PlainNotice::search_error(&e));
                if let Err(send_err) = sender.send_message(&msg.room, &notice).await {
                    tracing::error!("Failed to report search error: {}", send_err);
                }
                return Dispatch::QueryFailed {
                    error: e.to_string(),
                };
            }
        };

        let ctx = DeliveryContext {
            room: msg.room.clone(),
            trigger: msg.event_id.clone(),
        };
        let delivery = self.engine.deliver(&results, &ctx, sender).await;

        Dispatch::Delivered { delivery }
    }
}
