// Test helper functions

use async_trait::async_trait;
use romfinder::core::catalog::SqliteCatalog;
use romfinder::core::config::Config;
use romfinder::core::delivery::{
    ChatSender, EventId, OutgoingMessage, Reaction, ReactionKey, RoomId, ThreadedReply,
};
use romfinder::core::error::{Result, RomError};
use romfinder::core::services::Services;
use romfinder::core::types::CatalogRecord;
use std::sync::{Arc, Mutex};

/// In-memory catalog holding `records`
#[allow(dead_code)] // Used in integration tests
pub fn create_test_catalog(records: Vec<CatalogRecord>) -> Arc<SqliteCatalog> {
    let catalog = SqliteCatalog::open_in_memory().expect("Failed to open catalog");
    catalog
        .insert_records(records.into_iter().map(Ok), 0)
        .expect("Failed to insert records");
    Arc::new(catalog)
}

/// Services over an in-memory catalog with default limits
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(records: Vec<CatalogRecord>) -> Services {
    Services::with_catalog(Config::default(), create_test_catalog(records))
}

/// Something a [`RecordingSender`] was asked to send
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Reaction(ReactionKey, EventId),
    Message(OutgoingMessage),
}

/// Chat sender that records every call and can fail a given message
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<Sent>>,
    /// 1-based index of the message send that fails
    pub fail_message: Option<usize>,
}

#[allow(dead_code)]
impl RecordingSender {
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_message: Some(n),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn reactions(&self) -> Vec<ReactionKey> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Reaction(key, _) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<OutgoingMessage> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn replies(&self) -> Vec<ThreadedReply> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                OutgoingMessage::ThreadedReply(r) => Some(r),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatSender for RecordingSender {
    async fn send_reaction(&self, _room: &RoomId, reaction: &Reaction) -> Result<EventId> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Reaction(reaction.key, reaction.target.clone()));
        Ok(EventId::new("$reaction"))
    }

    async fn send_message(&self, _room: &RoomId, message: &OutgoingMessage) -> Result<EventId> {
        let mut sent = self.sent.lock().unwrap();
        let n = sent.iter().filter(|s| matches!(s, Sent::Message(_))).count() + 1;
        if self.fail_message == Some(n) {
            return Err(RomError::DeliverySend("connection reset".to_string()));
        }
        sent.push(Sent::Message(message.clone()));
        Ok(EventId::new(format!("$sent{n}")))
    }
}
