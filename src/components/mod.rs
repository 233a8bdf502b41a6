//! Reusable UI components shared across pages.

pub mod layout;
pub mod loading_spinner;
