//! File-backed session persistence, the terminal counterpart of the browser's
//! local storage. The file holds bearer tokens and is created owner-only.

use super::{AuthUser, Session};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

#[derive(Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<u64>,
    user_id: Option<String>,
    email: Option<String>,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            access_token: session.access_token.expose_secret().to_string(),
            refresh_token: session
                .refresh_token
                .as_ref()
                .map(|token| token.expose_secret().to_string()),
            expires_at: session.expires_at,
            user_id: session.user.as_ref().map(|user| user.id.clone()),
            email: session.user.as_ref().and_then(|user| user.email.clone()),
        }
    }
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        let user = stored.user_id.map(|id| AuthUser {
            id,
            email: stored.email,
        });
        Self::new(SecretString::from(stored.access_token), user)
            .with_refresh_token(stored.refresh_token.map(SecretString::from))
            .with_expires_at(stored.expires_at)
    }
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads a stored session. A missing file is not an error.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        let stored: StoredSession = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid session file: {}", self.path.display()))?;
        debug!("loaded stored session");
        Ok(Some(stored.into()))
    }

    /// # Errors
    /// Returns an error if the file cannot be written.
    #[instrument(skip(self, session), fields(path = %self.path.display()))]
    pub fn save(&self, session: &Session) -> Result<()> {
        let payload = serde_json::to_vec(&StoredSession::from(session))
            .context("Failed to encode session")?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }

        let mut file = open_private(&self.path)
            .with_context(|| format!("Failed to open session file: {}", self.path.display()))?;
        file.write_all(&payload)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        debug!("stored session");
        Ok(())
    }

    /// # Errors
    /// Returns an error if the file exists and cannot be removed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            }),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
