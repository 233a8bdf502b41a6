//! Client configuration resolved at build time.
//!
//! The browser has no process environment, so overrides are baked in with
//! `option_env!` when the WASM bundle is compiled. Parsing goes through
//! [`ClientConfig::from_lookup`] so the rules are testable natively.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE: &str = "/api/v1";
pub const DEFAULT_STORAGE_KEY: &str = "auth-storage";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 15_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for Authentication Service routes, without trailing `/`.
    pub api_base: String,
    /// Durable storage slot holding the persisted session.
    pub storage_key: String,
    /// Upper bound on a single login/register round-trip.
    pub request_timeout_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Build config from variables captured at compile time.
    ///
    /// - `MYCELIUM_API_BASE`: default `/api/v1`
    /// - `MYCELIUM_STORAGE_KEY`: default `auth-storage`
    /// - `MYCELIUM_REQUEST_TIMEOUT_MS`: default 15000
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                "MYCELIUM_API_BASE" => option_env!("MYCELIUM_API_BASE"),
                "MYCELIUM_STORAGE_KEY" => option_env!("MYCELIUM_STORAGE_KEY"),
                "MYCELIUM_REQUEST_TIMEOUT_MS" => option_env!("MYCELIUM_REQUEST_TIMEOUT_MS"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary key lookup. Missing or unparsable
    /// values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup("MYCELIUM_API_BASE")
            .map(|v| v.trim().trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
        let storage_key = lookup("MYCELIUM_STORAGE_KEY")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_owned());
        let request_timeout_ms = lookup("MYCELIUM_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);

        Self { api_base, storage_key, request_timeout_ms }
    }
}
