//! Durable persistence of the `{token, user}` pair.
//!
//! DESIGN
//! ======
//! Both slots are written and cleared together. Implementations keep the
//! pair in a single record (one mutex slot, one file) so a reader can never
//! observe a token without its user or the reverse.
//!
//! TRADE-OFFS
//! ==========
//! `load` swallows read and parse failures and reports "absent". A corrupted
//! record is indistinguishable from a logged-out device, which is the
//! behavior callers want: they re-authenticate instead of crashing.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use serde::{Deserialize, Serialize};

use crate::net::types::User;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session record could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A persisted credential together with the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

/// Client-local key/value persistence for exactly two fields.
pub trait TokenStore: Send + Sync {
    /// Write both fields. Readers see either the old pair or the new one.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record cannot be written.
    fn save(&self, token: &str, user: &User) -> Result<(), StoreError>;

    /// Read the pair, or `None` if absent, partial, or corrupted.
    fn load(&self) -> Option<StoredSession>;

    /// Remove both fields. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if an existing record cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
