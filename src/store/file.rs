//! File-backed token store.
//!
//! The pair is one JSON document. Saves go to a temp file in the target's
//! directory and are renamed over it, so a crash mid-write leaves the
//! previous record intact.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{StoreError, StoredSession, TokenStore};
use crate::net::types::User;

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

#[derive(serde::Serialize)]
struct RecordRef<'a> {
    token: &'a str,
    user: &'a User,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, token: &str, user: &User) -> Result<(), StoreError> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir)?;

        let body = serde_json::to_vec_pretty(&RecordRef { token, user })?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&body)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(path = %self.path.display(), "session record saved");
        Ok(())
    }

    fn load(&self) -> Option<StoredSession> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session record unreadable");
                return None;
            }
        };
        match serde_json::from_str::<StoredSession>(&text) {
            Ok(stored) if !stored.token.is_empty() => Some(stored),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session record corrupted");
                None
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
