//! Route authorization decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected screen asks the guard before rendering. The guard reads a
//! session snapshot and the route's role requirement and nothing else, so it
//! is safe to call on every navigation.
//!
//! DESIGN
//! ======
//! A user who is logged in but lacks the role goes home, not back to login:
//! the credential is valid, and bouncing to login would loop.

use crate::net::types::Role;
use crate::session::{RoleRequirement, Session};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not restored yet; render a placeholder, not a redirect.
    Pending,
    Allow,
    DenyToLogin,
    DenyToHome,
}

impl GuardDecision {
    /// Where a denied navigation should go.
    #[must_use]
    pub fn redirect(self) -> Option<&'static str> {
        match self {
            Self::DenyToLogin => Some(LOGIN_PATH),
            Self::DenyToHome => Some(HOME_PATH),
            Self::Pending | Self::Allow => None,
        }
    }
}

/// Decide whether a route guarded by `requirement` may render.
#[must_use]
pub fn evaluate(session: &Session, requirement: &RoleRequirement) -> GuardDecision {
    if !session.is_ready() {
        return GuardDecision::Pending;
    }
    if !session.is_authenticated() {
        return GuardDecision::DenyToLogin;
    }
    if requirement.is_restricted() && !session.has_role(requirement) {
        return GuardDecision::DenyToHome;
    }
    GuardDecision::Allow
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// Screens of the records application and their role requirements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Login,
    Dashboard,
    Users,
    Patients,
    MedicalRecords,
    CryptoDemo,
    AuditLogs,
}

impl AppRoute {
    /// Protected routes in navigation order.
    pub const NAVIGATION: [Self; 6] =
        [Self::Dashboard, Self::Users, Self::Patients, Self::MedicalRecords, Self::CryptoDemo, Self::AuditLogs];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => LOGIN_PATH,
            Self::Dashboard => HOME_PATH,
            Self::Users => "/users",
            Self::Patients => "/patients",
            Self::MedicalRecords => "/medical-records",
            Self::CryptoDemo => "/crypto-demo",
            Self::AuditLogs => "/audit",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::Users => "Users",
            Self::Patients => "Patients",
            Self::MedicalRecords => "Medical records",
            Self::CryptoDemo => "Crypto demo",
            Self::AuditLogs => "Audit log",
        }
    }

    /// Match a path, ignoring a trailing slash and any query string.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { HOME_PATH } else { trimmed };
        [Self::Login]
            .into_iter()
            .chain(Self::NAVIGATION)
            .find(|route| route.path() == normalized)
    }

    /// `false` only for the login screen.
    #[must_use]
    pub fn is_protected(self) -> bool {
        !matches!(self, Self::Login)
    }

    #[must_use]
    pub fn requirement(self) -> RoleRequirement {
        match self {
            Self::Users | Self::AuditLogs => RoleRequirement::Single(Role::Admin),
            Self::Patients => RoleRequirement::any_of([Role::Admin, Role::Doctor]),
            Self::Login | Self::Dashboard | Self::MedicalRecords | Self::CryptoDemo => RoleRequirement::None,
        }
    }

    /// Guard decision for this route. Nothing renders until restore has
    /// finished; after that the login screen always renders.
    #[must_use]
    pub fn decide(self, session: &Session) -> GuardDecision {
        if !session.is_ready() {
            return GuardDecision::Pending;
        }
        if self.is_protected() { evaluate(session, &self.requirement()) } else { GuardDecision::Allow }
    }
}

/// Routes a nav bar should offer for `session`. Empty until authenticated.
#[must_use]
pub fn navigation(session: &Session) -> Vec<AppRoute> {
    AppRoute::NAVIGATION
        .into_iter()
        .filter(|route| route.decide(session) == GuardDecision::Allow)
        .collect()
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
