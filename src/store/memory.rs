//! In-process token store.
//!
//! Holds the two slots as raw strings (token, serialized user), mirroring a
//! browser-style key/value store. Used by tests and by hosts that must not
//! touch disk.

use std::sync::Mutex;

use super::{StoreError, StoredSession, TokenStore};
use crate::net::types::User;

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slots: Mutex<Option<(String, String)>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write raw slot contents, bypassing serialization. Lets callers seed a
    /// record exactly as another client version would have left it.
    pub fn put_raw(&self, token: &str, user_json: &str) {
        *self.lock() = Some((token.to_owned(), user_json.to_owned()));
    }

    /// `true` when both slots are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<(String, String)>> {
        self.slots.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str, user: &User) -> Result<(), StoreError> {
        let user_json = serde_json::to_string(user)?;
        *self.lock() = Some((token.to_owned(), user_json));
        Ok(())
    }

    fn load(&self) -> Option<StoredSession> {
        let (token, user_json) = self.lock().clone()?;
        if token.is_empty() {
            return None;
        }
        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Some(StoredSession { token, user }),
            Err(e) => {
                tracing::warn!(error = %e, "stored user record is corrupted; treating session as absent");
                None
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.lock() = None;
        Ok(())
    }
}
