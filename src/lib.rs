//! # medsafe-client
//!
//! Client-side session and authorization core for the MedSafe hospital
//! records application.
//!
//! The crate decides who is logged in, keeps that decision durable across
//! restarts, and answers "may this screen render?" for a route. Record
//! screens, the crypto demo, and audit views live elsewhere and only talk to
//! this core through [`session::SessionController`] and [`guard::evaluate`].
//! Form helpers (national ID checksum, email, phone) live in [`validators`].

pub mod config;
pub mod guard;
pub mod net;
pub mod session;
pub mod store;
pub mod token;
pub mod validators;
