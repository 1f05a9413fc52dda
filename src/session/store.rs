//! Session persistence.
//!
//! The [`SessionStore`] trait keeps the identity context independent of where
//! a session survives between runs. [`JsonSessionStore`] keeps it in a small
//! JSON file written atomically (write-to-temp + rename).

use super::identity::Identity;
use crate::domain::error::{ChefdeskError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend for persisting the current identity.
pub trait SessionStore: Send + Sync {
    /// Loads the persisted identity. `Ok(None)` means no session was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if a saved session exists but cannot be read.
    fn load(&self) -> Result<Option<Identity>>;

    /// Persists `identity`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&self, identity: &Identity) -> Result<()>;

    /// Removes the persisted identity. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails.
    fn clear(&self) -> Result<()>;
}

/// On-disk container format.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    identity: Identity,
}

/// JSON file session store.
///
/// ```json
/// {
///   "version": 1,
///   "identity": { "id": 42, "username": "gordon", "name": "Gordon", "loginTime": "..." }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    file_path: PathBuf,
}

impl JsonSessionStore {
    /// Creates a store at `file_path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = ?file_path, "session store ready");
        Ok(Self { file_path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SessionStore for JsonSessionStore {
    fn load(&self) -> Result<Option<Identity>> {
        let contents = match std::fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: SessionFile = serde_json::from_str(&contents)
            .map_err(|e| ChefdeskError::Storage(format!("failed to parse session file: {e}")))?;
        tracing::debug!(version = file.version, chef_id = file.identity.id, "session loaded");
        Ok(Some(file.identity))
    }

    fn save(&self, identity: &Identity) -> Result<()> {
        let json = serde_json::to_string_pretty(&SessionFile {
            version: 1,
            identity: identity.clone(),
        })
        .map_err(|e| ChefdeskError::Storage(format!("failed to serialize session: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;
        tracing::debug!(path = ?self.file_path, "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionContext;
    use std::sync::Arc;

    fn chef() -> Identity {
        Identity {
            id: 42,
            username: "gordon".into(),
            name: "Gordon".into(),
            login_time: Some(chrono::Utc::now()),
        }
    }

    #[test]
    fn missing_file_means_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::new(dir.path().join("session.json")).unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = Arc::new(JsonSessionStore::new(path.clone()).unwrap());
        let session = SessionContext::with_store(store).unwrap();
        let identity = chef();
        session.establish(identity.clone()).unwrap();

        let reopened =
            SessionContext::with_store(Arc::new(JsonSessionStore::new(path.clone()).unwrap()))
                .unwrap();
        assert_eq!(reopened.current_identity(), Some(identity));

        reopened.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonSessionStore::new(path).unwrap();
        assert!(matches!(store.load(), Err(ChefdeskError::Storage(_))));
    }
}
