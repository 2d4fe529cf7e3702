//! Result delivery.
//!
//! Sends a result set back to the room: a reaction on the trigger
//! message, then either one overflow notice or a chain of threaded
//! batches where each batch replies to the one sent before it.

use crate::core::delivery::payload::{
    EventId, OutgoingMessage, OverflowNotice, Reaction, ReactionKey, RoomId, ThreadedReply,
};
use crate::core::error::Result;
use crate::core::types::ResultSet;
use async_trait::async_trait;
use serde::Serialize;

/// Outbound chat collaborator
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Annotate an event; returns the reaction's event id
    async fn send_reaction(&self, room: &RoomId, reaction: &Reaction) -> Result<EventId>;

    /// Send a message; returns its event id
    async fn send_message(&self, room: &RoomId, message: &OutgoingMessage) -> Result<EventId>;
}

/// Where results go: the room and the message that asked for them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryContext {
    pub room: RoomId,
    pub trigger: EventId,
}

/// What happened during one delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Too many matches; only the rejection and the notice were sent
    Overflow { total: usize },

    /// Every batch was sent
    Delivered { batches: usize, records: usize },

    /// A batch send failed; later batches were not attempted
    Halted { batches_sent: usize, error: String },
}

/// Batches and sends result sets
#[derive(Debug, Clone, Copy)]
pub struct DeliveryEngine {
    max_results: usize,
    batch_size: usize,
}

impl DeliveryEngine {
    pub fn new(max_results: usize, batch_size: usize) -> Self {
        Self {
            max_results,
            batch_size: batch_size.max(1),
        }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Deliver `results` in reply to `ctx.trigger`.
    ///
    /// Reaction and overflow-notice failures are logged and ignored. The
    /// first failed batch stops delivery.
    pub async fn deliver(
        &self,
        results: &ResultSet,
        ctx: &DeliveryContext,
        sender: &dyn ChatSender,
    ) -> DeliveryOutcome {
        if results.exceeds(self.max_results) {
            let total = results.total_matches.max(results.len());
            tracing::info!(
                "Rejecting query from {}: {} results (max {})",
                ctx.trigger,
                total,
                self.max_results
            );
            self.react(ctx, ReactionKey::Rejected, sender).await;

            match OverflowNotice::new(total, ctx.trigger.clone()) {
                Ok(notice) => {
                    let message = OutgoingMessage::OverflowNotice(notice);
                    if let Err(e) = sender.send_message(&ctx.room, &message).await {
                        tracing::error!("Failed to send overflow notice: {}", e);
                    }
                }
                Err(e) => tracing::error!("Failed to build overflow notice: {}", e),
            }

            return DeliveryOutcome::Overflow { total };
        }

        self.react(ctx, ReactionKey::Accepted, sender).await;

        let mut reply_to = ctx.trigger.clone();
        let mut batches_sent = 0;

        for batch in results.records.chunks(self.batch_size) {
            let sent = match ThreadedReply::from_batch(batch, ctx.trigger.clone(), reply_to.clone()) {
                Ok(reply) => {
                    sender
                        .send_message(&ctx.room, &OutgoingMessage::ThreadedReply(reply))
                        .await
                }
                Err(e) => Err(e),
            };

            match sent {
                Ok(event_id) => {
                    batches_sent += 1;
                    reply_to = event_id;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to send batch {} for {}: {}",
                        batches_sent + 1,
                        ctx.trigger,
                        e
                    );
                    return DeliveryOutcome::Halted {
                        batches_sent,
                        error: e.to_string(),
                    };
                }
            }
        }

        tracing::debug!(
            "Delivered {} record(s) in {} batch(es) to {}",
            results.len(),
            batches_sent,
            ctx.room
        );

        DeliveryOutcome::Delivered {
            batches: batches_sent,
            records: results.len(),
        }
    }

    async fn react(&self, ctx: &DeliveryContext, key: ReactionKey, sender: &dyn ChatSender) {
        let result = match Reaction::new(ctx.trigger.clone(), key) {
            Ok(reaction) => sender.send_reaction(&ctx.room, &reaction).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::error!("Failed to react to {}: {}", ctx.trigger, e);
        }
    }
}
