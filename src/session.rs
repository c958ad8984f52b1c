//! Bearer-token session persisted as session.json in the app data directory

use crate::error::Result;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// Unix seconds taken from the JWT `exp` claim.
    pub expires_at: Option<i64>,
}

impl Session {
    pub fn from_token(token: String) -> Self {
        let expires_at = decode_expiry(&token);
        if expires_at.is_none() {
            warn!("Token does not have a valid exp claim");
        }
        Self { token, expires_at }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Reads `exp` from the payload segment of a JWT without verifying it.
pub fn decode_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?;
    exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("session.json"),
        }
    }

    pub fn load(&self) -> Option<Session> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<Session>(&content) {
            Ok(session) => {
                debug!(path = %self.path.display(), "Session loaded");
                Some(session)
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session file");
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;
        info!(expires_at = ?session.expires_at, "Session saved");
        Ok(())
    }

    pub fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!("Session cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "Failed to remove session file"),
        }
    }
}
