//! XDG Base Directory Support
//!
//! Implements XDG Base Directory specification for proper file organization
//! on Linux/Unix systems. Provides automatic migration of a session token
//! left in the working directory by older deployments.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// XDG directory structure for romfinder
///
/// Implements XDG Base Directory specification with fallbacks and
/// explicit ROMFINDER_* overrides.
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl XdgDirs {
    /// Create new XDG directory structure with proper resolution order
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit ROMFINDER_* env vars
    /// 2. XDG_* environment variables
    /// 3. XDG defaults (~/.config, ~/.local/share, ~/.local/state)
    pub fn new() -> Self {
        Self {
            config_dir: resolve("ROMFINDER_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: resolve("ROMFINDER_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
            state_dir: resolve("ROMFINDER_STATE_DIR", "XDG_STATE_HOME", &[".local", "state"]),
        }
    }

    /// All directories under one root (for tests and portable installs)
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            state_dir: root.join("state"),
        }
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        // Check ROMFINDER_CONFIG_FILE first (explicit override)
        if let Ok(file) = env::var("ROMFINDER_CONFIG_FILE") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Default catalog database path
    pub fn catalog_file(&self) -> PathBuf {
        self.data_dir.join("links.db")
    }

    /// Default saved-session path
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join("token.json")
    }

    /// Create all XDG directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(&self.state_dir)?;
        Ok(())
    }

    /// Log the resolved XDG paths
    pub fn log_paths(&self) {
        tracing::info!("XDG directories resolved:");
        tracing::info!("  Config: {:?}", self.config_dir);
        tracing::info!("  Data: {:?}", self.data_dir);
        tracing::info!("  State: {:?}", self.state_dir);
        tracing::info!("  Config file: {:?}", self.config_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(own_var: &str, xdg_var: &str, fallback: &[&str]) -> PathBuf {
    if let Ok(dir) = env::var(own_var) {
        return PathBuf::from(dir);
    }

    if let Ok(xdg) = env::var(xdg_var) {
        return PathBuf::from(xdg).join("romfinder");
    }

    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    for part in fallback {
        path.push(part);
    }
    path.join("romfinder")
}

/// Migrate a legacy `./token.json` into the XDG state directory
///
/// Never deletes the original, only copies.
pub fn migrate_legacy_paths(xdg: &XdgDirs) -> std::io::Result<()> {
    let legacy_token = PathBuf::from("./token.json");
    let new_token = xdg.session_file();

    if legacy_token.exists() && !new_token.exists() {
        fs::create_dir_all(&xdg.state_dir)?;
        fs::copy(&legacy_token, &new_token)?;
        tracing::info!("Migrated session: {:?} → {:?}", legacy_token, new_token);
        tracing::info!(
            "Legacy session file preserved at {:?} (safe to delete after verification)",
            legacy_token
        );
    }

    Ok(())
}
