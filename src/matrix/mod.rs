//! Matrix transport adapter
//!
//! Implements the [`ChatSender`](crate::core::delivery::ChatSender)
//! collaborator over the Matrix client-server API and runs the sync
//! loop that feeds the dispatcher.
//!
//! - **client**: reqwest-based homeserver client
//! - **events**: wire types for login, sync and sends
//! - **session**: saved access token
//! - **bot**: login/restore and the sync loop

pub mod bot;
pub mod client;
pub mod events;
pub mod session;

pub use bot::{connect, Bot};
pub use client::MatrixClient;
pub use session::TokenStore;
