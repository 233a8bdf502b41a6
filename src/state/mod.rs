//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `auth` is the plain session data and its pure transitions; `session`
//! owns that data and performs the network-backed operations on it.

pub mod auth;
pub mod session;
