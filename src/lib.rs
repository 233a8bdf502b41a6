//! # mycelium-client
//!
//! Leptos + WASM shell for the knowledge-base web app: session state,
//! login/register flows, and the route gate in front of the protected pages.
//!
//! The session store is an explicitly owned object handed to the UI through
//! context. Its HTTP transport and durable storage are injected, so the pure
//! logic runs under plain `cargo test` without a browser.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: installs logging and hydrates the server-rendered app.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("hydrating client");
    leptos::mount::hydrate_body(app::App);
}
