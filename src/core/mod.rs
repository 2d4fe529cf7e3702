//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of the chat transport and the command line.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **search**: Term parsing, filter compilation and query execution
//! - **catalog**: SQLite catalog and link-list ingestion
//! - **delivery**: Batched, threaded result delivery
//! - **dispatch**: Command recognition and the end-to-end pipeline
//! - **services**: Unified service container

pub mod catalog;
pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod error;
pub mod search;
pub mod services;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, RomError};
pub use services::Services;
