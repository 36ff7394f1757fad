//! Remote API boundary.
//!
//! DESIGN
//! ======
//! `types` holds the wire/domain shapes shared with the rest of the crate;
//! `api` holds the `AuthService` trait and its reqwest implementation.

pub mod api;
pub mod types;
