//! Saved login session.

use crate::core::error::{Result, RomError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Access token and identity from a password login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStore {
    pub access_token: String,
    pub user_id: String,
    #[serde(default)]
    pub device_id: String,
}

impl TokenStore {
    /// Read a saved session
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| {
            RomError::Session(format!("Failed to read {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Read a saved session if one exists and carries a token
    pub fn load_usable(path: impl AsRef<Path>) -> Option<Self> {
        match Self::load(path) {
            Ok(store) if !store.access_token.is_empty() => Some(store),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("No saved session: {}", e);
                None
            }
        }
    }

    /// Write the session as pretty JSON, readable by the owner only
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(self)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    /// Fully-qualified user id, which must start with '@'
    pub fn checked_user_id(&self) -> Result<&str> {
        let user_id = self.user_id.trim();
        if !user_id.starts_with('@') {
            return Err(RomError::Session(format!(
                "User id does not start with '@': {:?}",
                self.user_id
            )));
        }
        Ok(user_id)
    }
}
