//! Persisted access token
//!
//! A single JSON file holding the [`TokenRecord`] returned by the token
//! endpoint. Written once by the authorization flow, read by every publish.

use std::path::{Path, PathBuf};

use crate::error::{AuthError, Result, TokenStoreError};
use crate::types::TokenRecord;

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the record, replacing any previous token
    pub fn save(&self, record: &TokenRecord) -> Result<()> {
        if record.access_token.trim().is_empty() {
            return Err(AuthError::InvalidTokenResponse("access_token is empty".to_string()).into());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(TokenStoreError::Io)?;
            }
        }

        let json = serde_json::to_string_pretty(record).map_err(TokenStoreError::Malformed)?;
        std::fs::write(&self.path, json).map_err(TokenStoreError::Io)?;

        // Set file permissions to 600 on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms).map_err(TokenStoreError::Io)?;
        }

        tracing::debug!("Stored access token at {:?}", self.path);
        Ok(())
    }

    pub fn load(&self) -> Result<TokenRecord> {
        if !self.path.exists() {
            return Err(TokenStoreError::NotFound(self.path.clone()).into());
        }

        let content = std::fs::read_to_string(&self.path).map_err(TokenStoreError::Io)?;
        let record: TokenRecord =
            serde_json::from_str(&content).map_err(TokenStoreError::Malformed)?;

        tracing::debug!("Loaded access token from {:?}", self.path);
        Ok(record)
    }
}
