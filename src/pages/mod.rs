//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration. Which page renders for a path
//! is decided by `util::route_gate`, not by the pages themselves.

pub mod dashboard;
pub mod login;
pub mod register;
pub mod sections;
