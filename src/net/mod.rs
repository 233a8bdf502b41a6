//! Networking modules for the Authentication Service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns the HTTP transport and its error type, `types` defines the
//! wire schema shared with the backend.

pub mod api;
pub mod types;
