//! Error types and error handling for the romfinder service.
//!
//! This module defines the error types used throughout the
//! application. Transport-specific handling (homeserver responses,
//! session tokens) maps into the same enum so callers only ever
//! inspect one `Result`.

use thiserror::Error;

/// Result type alias for romfinder operations
pub type Result<T> = std::result::Result<T, RomError>;

/// Main error type for the romfinder service
#[derive(Error, Debug)]
pub enum RomError {
    /// The catalog storage call itself failed (connection, syntax, I/O).
    #[error("Query failed: {0}")]
    QueryError(String),

    /// A send to the chat transport failed.
    #[error("Send failed: {0}")]
    DeliverySend(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Ingest failed: {0}")]
    Ingest(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RomError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error came from the catalog
    pub fn is_query_error(&self) -> bool {
        matches!(self, RomError::QueryError(_) | RomError::Database(_))
    }

    /// Check if this error came from sending to the chat transport
    pub fn is_delivery_error(&self) -> bool {
        matches!(
            self,
            RomError::DeliverySend(_) | RomError::Transport(_) | RomError::Http(_)
        )
    }

    /// Check if this is a configuration problem (fatal at startup)
    pub fn is_config_error(&self) -> bool {
        matches!(self, RomError::ConfigError(_) | RomError::TomlError(_))
    }
}
