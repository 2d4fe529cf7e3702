//! Result delivery back to the chat room.
//!
//! - **payload**: typed message kinds and HTML/plain rendering
//! - **engine**: batching, reactions and reply threading

mod engine;
mod payload;

pub use engine::{ChatSender, DeliveryContext, DeliveryEngine, DeliveryOutcome};
pub use payload::{
    escape_html, render_html, render_plain, EventId, OutgoingMessage, OverflowNotice, PlainNotice,
    Reaction, ReactionKey, RoomId, ThreadedReply,
};
