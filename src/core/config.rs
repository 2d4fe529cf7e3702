//! Configuration management for the romfinder service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings
//! except the chat credentials.

use crate::core::error::{Result, RomError};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Chat account and room
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatrixConfig {
    /// Homeserver base URL (e.g. https://matrix.org)
    #[serde(default, alias = "server")]
    pub homeserver: String,

    #[serde(default)]
    pub username: String,

    /// Only needed for the first login; a saved session token is reused
    #[serde(default)]
    pub password: String,

    /// The single room the bot answers in
    #[serde(default)]
    pub room: String,
}

/// Catalog storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Command verb, including the leading `!`
    #[serde(default = "default_command")]
    pub command: String,

    /// More matches than this are rejected instead of sent
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Records per message
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Link-list ingestion configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Only URLs under this prefix are catalogued
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,

    /// Only URLs ending with this are catalogued
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Log progress every N accepted lines (0 disables)
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

/// Sync loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Long-poll timeout passed to the homeserver
    #[serde(default = "default_sync_timeout_ms")]
    pub timeout_ms: u64,

    /// HTTP request timeout in seconds (must exceed the long-poll)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,

    /// Saved session token file
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

// Default value functions
fn default_db_path() -> PathBuf {
    PathBuf::from("./links.db")
}

fn default_command() -> String {
    "!roms".to_string()
}

fn default_max_results() -> usize {
    1000
}

fn default_batch_size() -> usize {
    100
}

fn default_url_prefix() -> String {
    "https://myrient.erista.me/files/".to_string()
}

fn default_extension() -> String {
    ".zip".to_string()
}

fn default_progress_every() -> usize {
    10_000
}

fn default_sync_timeout_ms() -> u64 {
    30_000
}

fn default_request_timeout() -> u64 {
    60
}

fn default_session_file() -> PathBuf {
    PathBuf::from("./token.json")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            max_results: default_max_results(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            url_prefix: default_url_prefix(),
            extension: default_extension(),
            progress_every: default_progress_every(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_sync_timeout_ms(),
            request_timeout_sec: default_request_timeout(),
            session_file: default_session_file(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| RomError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. ROMFINDER_CONFIG env var
    /// 2. XDG config file (~/.config/romfinder/config.toml)
    /// 3. ./config.toml in the working directory
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("ROMFINDER_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("config.toml").exists() {
                Self::from_file("config.toml")?
            } else {
                Self::default()
            }
        };

        // Relocate default paths into XDG directories unless set explicitly
        if config.catalog.db_path == default_db_path() {
            config.catalog.db_path = xdg.catalog_file();
        }
        if config.sync.session_file == default_session_file() {
            config.sync.session_file = xdg.session_file();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Matrix configuration
        if let Ok(homeserver) = env::var("ROMFINDER_HOMESERVER") {
            self.matrix.homeserver = homeserver;
        }
        if let Ok(username) = env::var("ROMFINDER_USERNAME") {
            self.matrix.username = username;
        }
        if let Ok(password) = env::var("ROMFINDER_PASSWORD") {
            self.matrix.password = password;
        }
        if let Ok(room) = env::var("ROMFINDER_ROOM") {
            self.matrix.room = room;
        }

        // Catalog configuration
        if let Ok(db_path) = env::var("ROMFINDER_DB_PATH") {
            self.catalog.db_path = PathBuf::from(db_path);
        }

        // Search configuration
        if let Ok(max_results) = env::var("ROMFINDER_MAX_RESULTS") {
            if let Ok(n) = max_results.parse() {
                self.search.max_results = n;
            }
        }
        if let Ok(batch_size) = env::var("ROMFINDER_BATCH_SIZE") {
            if let Ok(n) = batch_size.parse() {
                self.search.batch_size = n;
            }
        }

        // Sync configuration
        if let Ok(timeout) = env::var("ROMFINDER_SYNC_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                self.sync.timeout_ms = t;
            }
        }
        if let Ok(session_file) = env::var("ROMFINDER_SESSION_FILE") {
            self.sync.session_file = PathBuf::from(session_file);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.search.max_results == 0 {
            return Err(RomError::ConfigError(
                "Max results must be non-zero".to_string(),
            ));
        }

        if self.search.batch_size == 0 {
            return Err(RomError::ConfigError(
                "Batch size must be non-zero".to_string(),
            ));
        }

        if !self.search.command.starts_with('!')
            || self.search.command.len() < 2
            || self.search.command.chars().any(char::is_whitespace)
        {
            return Err(RomError::ConfigError(format!(
                "Command must start with '!' and contain no whitespace: {:?}",
                self.search.command
            )));
        }

        if self.ingest.url_prefix.is_empty() {
            return Err(RomError::ConfigError(
                "Ingest URL prefix must be non-empty".to_string(),
            ));
        }

        if self.sync.request_timeout_sec.saturating_mul(1000) <= self.sync.timeout_ms {
            return Err(RomError::ConfigError(
                "Request timeout must exceed the sync long-poll timeout".to_string(),
            ));
        }

        Ok(())
    }

    /// Check the settings only the bot needs
    pub fn validate_for_bot(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("matrix.homeserver", &self.matrix.homeserver),
            ("matrix.username", &self.matrix.username),
            ("matrix.room", &self.matrix.room),
        ]
        .iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| *k)
        .collect();

        if !missing.is_empty() {
            return Err(RomError::ConfigError(format!(
                "Missing required setting(s): {}",
                missing.join(", ")
            )));
        }

        if !self.matrix.room.starts_with('!') {
            return Err(RomError::ConfigError(format!(
                "Room must be a room ID starting with '!': {}",
                self.matrix.room
            )));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Homeserver: {}", self.matrix.homeserver);
        tracing::info!("  Username: {}", self.matrix.username);
        tracing::info!(
            "  Password: {}",
            if self.matrix.password.is_empty() { "(unset)" } else { "********" }
        );
        tracing::info!("  Room: {}", self.matrix.room);
        tracing::info!("  Catalog: {:?}", self.catalog.db_path);
        tracing::info!("  Command: {}", self.search.command);
        tracing::info!("  Max results: {}", self.search.max_results);
        tracing::info!("  Batch size: {}", self.search.batch_size);
        tracing::info!("  Sync timeout: {}ms", self.sync.timeout_ms);
        tracing::info!("  Session file: {:?}", self.sync.session_file);
    }
}
