//! romfinder - chat-triggered catalog search
//!
//! A bot that answers `!roms <query>` in a Matrix room by searching a
//! SQLite catalog of downloadable files and replying with threaded,
//! batched result lists.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg
//!   - search (term parsing, filter compilation, query execution)
//!   - catalog (SQLite store, link-list ingestion)
//!   - delivery (typed payloads, batching and threading)
//!   - dispatch (command recognition, end-to-end pipeline)
//!   - services (unified service container)
//!
//! - **matrix**: Matrix adapter (depends on core)
//!   - client, events, session, bot
//!
//! - **cli**: clap adapter (depends on core and matrix)
//!   - run, ingest, search, show-config, completions
//!
//! # Query syntax
//!
//! - Words are matched case-insensitively as substrings of the
//!   section, console or file name.
//! - `'...'` or `"..."` keep spaces inside a term.
//! - A leading `-` excludes records containing the term.
//! - All terms must hold at once.

// Core domain logic (protocol-agnostic)
pub mod core;

// Matrix chat adapter
pub mod matrix;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, RomError};
pub use core::services::Services;
pub use core::types::*;
