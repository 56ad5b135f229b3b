// src/infrastructure/session.rs
use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A signed-in session handed out by the identity provider
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

// Keep the token out of logs
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Session persisted as JSON on disk
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/noteboard/session.json`
    pub fn default_location() -> Result<Self, DomainError> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join("noteboard").join("session.json")))
            .ok_or_else(|| DomainError::Session("Could not find config directory".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sign_in(&self, session: &Session) -> Result<(), DomainError> {
        if session.token.trim().is_empty() {
            return Err(DomainError::Session("token must not be empty".to_string()));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| session_io("create session directory", e))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| DomainError::Session(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| session_io("write session", e))?;
        info!(username = ?session.username, "Signed in");
        Ok(())
    }

    /// Current session, if signed in
    pub fn current(&self) -> Result<Option<Session>, DomainError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content)
                .map(Some)
                .map_err(|e| DomainError::Session(format!("Corrupt session file: {e}"))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(session_io("read session", e)),
        }
    }

    pub fn require(&self) -> Result<Session, DomainError> {
        self.current()?.ok_or(DomainError::Unauthenticated)
    }

    /// Forget the session; signing out twice is fine
    pub fn sign_out(&self) -> Result<(), DomainError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session to sign out of");
                Ok(())
            }
            Err(e) => Err(session_io("remove session", e)),
        }
    }
}

fn session_io(action: &str, e: std::io::Error) -> DomainError {
    DomainError::Session(format!("Failed to {action}: {e}"))
}
