//! Shared DTOs for the client/API boundary.
//!
//! DESIGN
//! ======
//! Field names follow the upstream REST API (`rol`, `nombre_completo`) on the
//! wire and English names in Rust. The same serialization is used for the
//! persisted user record, so a stored user always re-reads as what the API
//! sent.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse-grained user classification used for route authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Patient => "patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated user as returned by `/auth/login` and `/auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned numeric identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Display name (`nombre apellido`).
    #[serde(rename = "nombre_completo", alias = "full_name")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "rol", alias = "role")]
    pub role: Role,
    /// National identifier, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cedula: Option<String>,
}

/// Outcome of a remote login call, flattened out of the API envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginReply {
    pub success: bool,
    pub token: Option<String>,
    pub user: Option<User>,
    /// Server-provided failure message, if any.
    pub error: Option<String>,
}

/// Standard upstream response envelope: `{success, data?, error?}`. The
/// informational `message` field is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// `data` payload of a successful login envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Envelope<LoginData> {
    /// Flatten the login envelope into a [`LoginReply`].
    pub(crate) fn into_reply(self) -> LoginReply {
        let (token, user) = match self.data {
            Some(data) => (data.token, data.user),
            None => (None, None),
        };
        LoginReply { success: self.success, token, user, error: self.error }
    }
}
