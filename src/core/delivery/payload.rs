//! Typed outgoing payloads.
//!
//! Every message kind the bot can send has its own struct, validated
//! when it is built. Transport adapters map these onto their wire
//! format; nothing here knows about JSON.

use crate::core::error::{Result, RomError};
use crate::core::types::CatalogRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a chat event (message, reaction)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

/// Identifier of a chat room
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(EventId);
string_id!(RoomId);

/// Annotation glyph placed on the triggering message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKey {
    Accepted,
    Rejected,
}

impl ReactionKey {
    /// Emoji sent as the annotation key
    pub fn glyph(self) -> &'static str {
        match self {
            ReactionKey::Accepted => "\u{2705}\u{fe0f}",
            ReactionKey::Rejected => "\u{274c}\u{fe0f}",
        }
    }
}

/// Reaction annotating an existing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub target: EventId,
    pub key: ReactionKey,
}

impl Reaction {
    pub fn new(target: EventId, key: ReactionKey) -> Result<Self> {
        require_id(&target, "reaction target")?;
        Ok(Self { target, key })
    }
}

/// One result batch, threaded under the trigger message
///
/// Always carries the fallback marker so clients without thread support
/// render it as a plain reply to `reply_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadedReply {
    pub body: String,
    pub html: String,
    pub thread_root: EventId,
    pub reply_to: EventId,
}

impl ThreadedReply {
    pub fn new(body: String, html: String, thread_root: EventId, reply_to: EventId) -> Result<Self> {
        require_text(&body, "reply body")?;
        require_text(&html, "reply html")?;
        require_id(&thread_root, "thread root")?;
        require_id(&reply_to, "reply target")?;
        Ok(Self {
            body,
            html,
            thread_root,
            reply_to,
        })
    }

    /// Render a batch of records into a threaded reply
    pub fn from_batch(batch: &[CatalogRecord], thread_root: EventId, reply_to: EventId) -> Result<Self> {
        Self::new(render_plain(batch), render_html(batch), thread_root, reply_to)
    }

    /// Whether this reply is rendered as a fallback for thread-unaware clients
    pub fn is_falling_back(&self) -> bool {
        true
    }
}

/// Plain reply reporting that a query matched too much
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowNotice {
    pub body: String,
    pub reply_to: EventId,
    pub count: usize,
}

impl OverflowNotice {
    pub fn new(count: usize, reply_to: EventId) -> Result<Self> {
        require_id(&reply_to, "reply target")?;
        Ok(Self {
            body: format!("Too many results: {count}"),
            reply_to,
            count,
        })
    }
}

/// Unthreaded room notice (used for search errors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainNotice {
    pub body: String,
}

impl PlainNotice {
    pub fn new(body: impl Into<String>) -> Result<Self> {
        let body = body.into();
        require_text(&body, "notice body")?;
        Ok(Self { body })
    }

    pub fn search_error(err: &impl fmt::Display) -> Self {
        Self {
            body: format!("Search error: {err}"),
        }
    }
}

/// Every message kind the bot sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMessage {
    ThreadedReply(ThreadedReply),
    OverflowNotice(OverflowNotice),
    PlainNotice(PlainNotice),
}

impl OutgoingMessage {
    /// Plain-text body, present for every kind
    pub fn body(&self) -> &str {
        match self {
            OutgoingMessage::ThreadedReply(m) => &m.body,
            OutgoingMessage::OverflowNotice(m) => &m.body,
            OutgoingMessage::PlainNotice(m) => &m.body,
        }
    }
}

fn require_text(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(RomError::InvalidPayload(format!("{what} is empty")));
    }
    Ok(())
}

fn require_id(id: &EventId, what: &str) -> Result<()> {
    if id.as_str().trim().is_empty() {
        return Err(RomError::InvalidPayload(format!("{what} is missing")));
    }
    Ok(())
}

/// One `section - console - file` line per record
pub fn render_plain(batch: &[CatalogRecord]) -> String {
    batch
        .iter()
        .map(|r| format!("{} - {} - {}\n", r.section, r.console, r.file))
        .collect()
}

/// One line per record with the file name linked to its URL
///
/// The URL is inserted verbatim; every other field is escaped.
pub fn render_html(batch: &[CatalogRecord]) -> String {
    batch
        .iter()
        .map(|r| {
            format!(
                "{} - {} - <a href=\"{}\">{}</a><br>",
                escape_html(&r.section),
                escape_html(&r.console),
                r.url,
                escape_html(&r.file)
            )
        })
        .collect()
}

/// Escape `& < > " '` for HTML text and attribute content
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
