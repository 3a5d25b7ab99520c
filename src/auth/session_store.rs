//! Persistence for the signed-in session between process runs.
//!
//! The store is deliberately dumb: load/save/clear of one serialized
//! [`Session`]. A corrupt cache file is treated as "no session" rather than
//! an error, so a bad write can never lock the user out of the app.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::warn;

use crate::auth::Session;
use crate::error::AuthError;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, AuthError>;
    async fn save(&self, session: &Session) -> Result<(), AuthError>;
    async fn clear(&self) -> Result<(), AuthError>;
}

/// File-backed store under the user config dir.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, AuthError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::SessionStore(e.to_string())),
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding unreadable session cache");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::SessionStore(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| AuthError::SessionStore(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| AuthError::SessionStore(e.to_string()))
    }

    async fn clear(&self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::SessionStore(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FileSessionStore, SessionStore};
    use crate::testing::test_session;

    #[tokio::test]
    async fn load_of_missing_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert!(store.load().await.expect("load").is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        let session = test_session("at-roundtrip");
        store.save(&session).await.expect("save");

        let loaded = store.load().await.expect("load").expect("session present");
        assert_eq!(loaded.access_token, "at-roundtrip");
        assert_eq!(loaded.refresh_token, session.refresh_token);
    }

    #[tokio::test]
    async fn corrupt_cache_is_discarded_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "{not json").await.expect("write");

        let store = FileSessionStore::new(path);
        assert!(store.load().await.expect("load").is_none());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.save(&test_session("at-clear")).await.expect("save");
        store.clear().await.expect("first clear");
        store.clear().await.expect("second clear");
        assert!(store.load().await.expect("load").is_none());
    }
}
