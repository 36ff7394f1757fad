//! Session lifecycle: restore, login, logout, and role queries.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionController` exists per client process and is passed to every
//! consumer (route guard, nav bar, screens). It is the only writer of the
//! session value; everyone else reads snapshots or subscribes.
//!
//! ARCHITECTURE
//! ============
//! `Restoring -> {Authenticated, Unauthenticated}`, then
//! `Authenticated <-> Unauthenticated` via login/logout. The value lives in a
//! `tokio::sync::watch` channel so UI hosts can react to transitions, and
//! every transition replaces the whole value at once.
//!
//! TRADE-OFFS
//! ==========
//! Remote calls run outside the commit lock, so a login and a logout may
//! overlap. Each one persists and swaps the session inside the same short
//! critical section, which means the last to finish decides both the store
//! and the in-memory value, and a token is never paired with another
//! identity's user. Logout never waits on the server to clear local state.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;

use crate::net::api::{ApiError, AuthService};
use crate::net::types::{Role, User};
use crate::store::{StoreError, TokenStore};
use crate::token;

/// Upper bound on how long logout waits for the server before clearing.
pub const DEFAULT_LOGOUT_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// ROLE REQUIREMENT
// =============================================================================

/// Role restriction declared by a route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Any authenticated user.
    #[default]
    None,
    Single(Role),
    AnyOf(BTreeSet<Role>),
}

impl RoleRequirement {
    #[must_use]
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::AnyOf(roles.into_iter().collect())
    }

    /// `true` unless this is [`RoleRequirement::None`].
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether a user holding `role` satisfies this requirement.
    #[must_use]
    pub fn admits(&self, role: Role) -> bool {
        match self {
            Self::None => true,
            Self::Single(required) => *required == role,
            Self::AnyOf(roles) => roles.contains(&role),
        }
    }
}

impl From<Role> for RoleRequirement {
    fn from(role: Role) -> Self {
        Self::Single(role)
    }
}

// =============================================================================
// SESSION VALUE
// =============================================================================

/// Credential and identity of a logged-in user.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub user: User,
    pub token: String,
    /// Token `exp`, epoch seconds.
    pub expires_at: u64,
}

impl fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The client's belief about who is logged in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    /// Persisted state not yet examined. Not ready for guard decisions.
    #[default]
    Restoring,
    Authenticated(AuthenticatedSession),
    Unauthenticated,
}

impl Session {
    /// `false` only while restoring.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::Restoring)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(auth) => Some(&auth.user),
            _ => None,
        }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated(auth) => Some(&auth.token),
            _ => None,
        }
    }

    /// False whenever not authenticated; otherwise whether the user's role
    /// satisfies `requirement`.
    #[must_use]
    pub fn has_role(&self, requirement: &RoleRequirement) -> bool {
        self.role().is_some_and(|role| requirement.admits(role))
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Why a login attempt did not produce a session. `Display` is suitable for
/// showing to the user.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("{0}")]
    Rejected(String),
    #[error("login failed: malformed server response ({0})")]
    MalformedResponse(String),
    #[error("could not reach the server: {0}")]
    Transport(#[from] ApiError),
    #[error("could not save the session: {0}")]
    Persist(#[from] StoreError),
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct SessionController {
    auth: Arc<dyn AuthService>,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
    /// Serializes "write store + swap session" so the two never diverge.
    commit: Mutex<()>,
    restored: AtomicBool,
    logout_timeout: Duration,
}

impl SessionController {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthService>, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::Restoring);
        Self {
            auth,
            store,
            state,
            commit: Mutex::new(()),
            restored: AtomicBool::new(false),
            logout_timeout: DEFAULT_LOGOUT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_logout_timeout(mut self, timeout: Duration) -> Self {
        self.logout_timeout = timeout;
        self
    }

    /// Current session value.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    #[must_use]
    pub fn has_role(&self, requirement: &RoleRequirement) -> bool {
        self.state.borrow().has_role(requirement)
    }

    /// Wait until restore has produced a decision.
    pub async fn wait_ready(&self) -> Session {
        let mut rx = self.state.subscribe();
        let ready = rx.wait_for(Session::is_ready).await.map(|session| session.clone());
        ready.unwrap_or_else(|_| self.snapshot())
    }

    /// Rebuild the session from the token store. Runs once; later calls
    /// return the current snapshot unchanged.
    pub fn restore(&self) -> Session {
        self.restore_at(token::now_epoch_secs())
    }

    /// Internal: restore with explicit clock (for testing).
    pub(crate) fn restore_at(&self, now: u64) -> Session {
        if self.restored.swap(true, Ordering::SeqCst) {
            tracing::debug!("session already restored");
            return self.snapshot();
        }

        let _commit = self.lock_commit();
        let next = match self.store.load() {
            None => {
                tracing::debug!("no persisted session");
                self.clear_store();
                Session::Unauthenticated
            }
            Some(stored) => match token::check_at(&stored.token, now) {
                Ok(claims) => {
                    tracing::info!(user = %stored.user.username, role = %stored.user.role, "session restored");
                    Session::Authenticated(AuthenticatedSession {
                        user: stored.user,
                        token: stored.token,
                        expires_at: claims.exp,
                    })
                }
                Err(e) => {
                    tracing::info!(reason = %e, "discarding persisted session");
                    self.clear_store();
                    Session::Unauthenticated
                }
            },
        };
        self.state.send_replace(next.clone());
        next
    }

    /// Authenticate against the remote service and persist the result.
    ///
    /// # Errors
    ///
    /// Returns a [`LoginError`] describing the failure. The session is left
    /// exactly as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, LoginError> {
        let reply = self.auth.login(username, password).await.map_err(|e| {
            tracing::warn!(%username, error = %e, "login request failed");
            match e {
                ApiError::Response { .. } => LoginError::MalformedResponse(e.to_string()),
                other => LoginError::Transport(other),
            }
        })?;

        if !reply.success {
            tracing::info!(%username, "login rejected");
            return Err(LoginError::Rejected(reply.error.unwrap_or_else(|| "login failed".to_owned())));
        }
        let (Some(token), Some(user)) = (reply.token, reply.user) else {
            return Err(LoginError::MalformedResponse("missing token or user".to_owned()));
        };
        let claims = token::check_at(&token, token::now_epoch_secs())
            .map_err(|e| LoginError::MalformedResponse(e.to_string()))?;

        {
            let _commit = self.lock_commit();
            self.store.save(&token, &user)?;
            self.state.send_replace(Session::Authenticated(AuthenticatedSession {
                user: user.clone(),
                token,
                expires_at: claims.exp,
            }));
        }

        tracing::info!(user = %user.username, role = %user.role, "logged in");
        Ok(user)
    }

    /// End the session. Local state is cleared whatever the server says.
    pub async fn logout(&self) {
        let token = self.snapshot().token().map(str::to_owned);
        if let Some(token) = token {
            match tokio::time::timeout(self.logout_timeout, self.auth.logout(&token)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "remote logout failed; clearing local session anyway"),
                Err(_) => tracing::warn!(
                    timeout_ms = u64::try_from(self.logout_timeout.as_millis()).unwrap_or(u64::MAX),
                    "remote logout timed out; clearing local session anyway"
                ),
            }
        }

        let _commit = self.lock_commit();
        self.clear_store();
        self.state.send_replace(Session::Unauthenticated);
        tracing::info!("logged out");
    }

    /// Re-check the in-memory token's expiry. Returns `true` if the session
    /// was expired and has been cleared.
    pub fn expire_if_stale(&self) -> bool {
        self.expire_if_stale_at(token::now_epoch_secs())
    }

    pub(crate) fn expire_if_stale_at(&self, now: u64) -> bool {
        let _commit = self.lock_commit();
        let expired = match &*self.state.borrow() {
            Session::Authenticated(auth) => auth.expires_at <= now,
            _ => false,
        };
        if expired {
            tracing::info!("session token expired");
            self.clear_store();
            self.state.send_replace(Session::Unauthenticated);
        }
        expired
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "failed to clear persisted session");
        }
    }

    fn lock_commit(&self) -> MutexGuard<'_, ()> {
        self.commit.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
