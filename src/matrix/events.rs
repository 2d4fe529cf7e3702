//! Matrix client-server API wire types.
//!
//! Only the fields the bot reads or writes are modelled. Outgoing
//! content is derived from the typed payloads in
//! [`crate::core::delivery`].

use crate::core::delivery::{EventId, OutgoingMessage, Reaction, RoomId};
use crate::core::dispatch::IncomingMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const MESSAGE_EVENT: &str = "m.room.message";
pub const REACTION_EVENT: &str = "m.reaction";
pub const HTML_FORMAT: &str = "org.matrix.custom.html";

// --- login ---

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub identifier: UserIdentifier<'a>,
    pub password: &'a str,
    pub initial_device_display_name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UserIdentifier<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub user: &'a str,
}

impl<'a> LoginRequest<'a> {
    pub fn password(user: &'a str, password: &'a str) -> Self {
        Self {
            kind: "m.login.password",
            identifier: UserIdentifier {
                kind: "m.id.user",
                user,
            },
            password,
            initial_device_display_name: "romfinder",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user_id: String,
    #[serde(default)]
    pub device_id: String,
}

/// Standard error body returned by the homeserver
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub errcode: String,
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    pub event_id: EventId,
}

// --- outgoing content ---

/// `m.reaction` content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactionContent {
    #[serde(rename = "m.relates_to")]
    pub relates_to: Annotation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub rel_type: &'static str,
    pub event_id: EventId,
    pub key: &'static str,
}

impl From<&Reaction> for ReactionContent {
    fn from(reaction: &Reaction) -> Self {
        Self {
            relates_to: Annotation {
                rel_type: "m.annotation",
                event_id: reaction.target.clone(),
                key: reaction.key.glyph(),
            },
        }
    }
}

/// `m.room.message` content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageContent {
    pub msgtype: &'static str,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_body: Option<String>,
    #[serde(rename = "m.relates_to", skip_serializing_if = "Option::is_none")]
    pub relates_to: Option<Relation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_falling_back: Option<bool>,
    #[serde(rename = "m.in_reply_to")]
    pub in_reply_to: InReplyTo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InReplyTo {
    pub event_id: EventId,
}

impl Relation {
    fn reply(to: &EventId) -> Self {
        Self {
            rel_type: None,
            event_id: None,
            is_falling_back: None,
            in_reply_to: InReplyTo {
                event_id: to.clone(),
            },
        }
    }
}

impl From<&OutgoingMessage> for MessageContent {
    fn from(message: &OutgoingMessage) -> Self {
        match message {
            OutgoingMessage::ThreadedReply(reply) => Self {
                msgtype: "m.text",
                body: reply.body.clone(),
                format: Some(HTML_FORMAT),
                formatted_body: Some(reply.html.clone()),
                relates_to: Some(Relation {
                    rel_type: Some("m.thread"),
                    event_id: Some(reply.thread_root.clone()),
                    is_falling_back: Some(reply.is_falling_back()),
                    in_reply_to: InReplyTo {
                        event_id: reply.reply_to.clone(),
                    },
                }),
            },
            OutgoingMessage::OverflowNotice(notice) => Self {
                msgtype: "m.text",
                body: notice.body.clone(),
                format: None,
                formatted_body: None,
                relates_to: Some(Relation::reply(&notice.reply_to)),
            },
            OutgoingMessage::PlainNotice(notice) => Self {
                msgtype: "m.text",
                body: notice.body.clone(),
                format: None,
                formatted_body: None,
                relates_to: None,
            },
        }
    }
}

// --- sync ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncResponse {
    pub next_batch: String,
    #[serde(default)]
    pub rooms: Rooms,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rooms {
    #[serde(default)]
    pub join: HashMap<String, JoinedRoom>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinedRoom {
    #[serde(default)]
    pub timeline: Timeline,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub events: Vec<RoomEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub event_id: String,
    pub sender: String,
    #[serde(default)]
    pub origin_server_ts: i64,
    #[serde(default)]
    pub content: Value,
}

impl RoomEvent {
    /// Convert a text-bearing `m.room.message` into an [`IncomingMessage`]
    pub fn to_message(&self, room: &str) -> Option<IncomingMessage> {
        if self.kind != MESSAGE_EVENT {
            return None;
        }
        let body = self.content.get("body")?.as_str()?;
        let msgtype = self.content.get("msgtype")?.as_str()?;

        Some(IncomingMessage {
            event_id: EventId::new(self.event_id.as_str()),
            room: RoomId::new(room),
            sender: self.sender.clone(),
            body: body.to_string(),
            msgtype: msgtype.to_string(),
            timestamp_ms: self.origin_server_ts,
        })
    }
}

impl SyncResponse {
    /// Message events from joined rooms, in timeline order per room
    pub fn messages(&self) -> Vec<IncomingMessage> {
        self.rooms
            .join
            .iter()
            .flat_map(|(room, joined)| {
                joined
                    .timeline
                    .events
                    .iter()
                    .filter_map(move |ev| ev.to_message(room))
            })
            .collect()
    }
}
