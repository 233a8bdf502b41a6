//! Authentication Service client.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, each raced against
//! a `gloo-timers` timeout.
//! Server-side (SSR) and native tests: [`HttpAuthTransport`] reports
//! [`AuthError::Unavailable`]; tests inject their own [`AuthTransport`].
//!
//! ERROR HANDLING
//! ==============
//! Every failure becomes an [`AuthError`] returned to the caller. Nothing is
//! retried here; the session store decides what state survives a failure.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
#[cfg(any(test, feature = "hydrate"))]
use super::types::ErrorBody;
use crate::config::ClientConfig;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("request rejected ({status}){}", detail_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },
    #[error("network error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("response did not include an access token")]
    MissingToken,
    #[error("request timed out after {after_ms} ms")]
    Timeout { after_ms: u32 },
    #[error("another sign-in request is already in progress")]
    InFlight,
    #[error("not available on server")]
    Unavailable,
}

#[allow(clippy::ref_option)]
fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!(": {detail}"),
        _ => String::new(),
    }
}

/// Credential exchange with the Authentication Service.
///
/// `?Send` because browser futures are single-threaded.
#[async_trait::async_trait(?Send)]
pub trait AuthTransport {
    /// Exchange email + password for a user and access token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    async fn login(&self, request: &LoginRequest<'_>) -> Result<LoginResponse, AuthError>;

    /// Create an account and receive its access token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    async fn register(&self, request: &RegisterRequest<'_>) -> Result<RegisterResponse, AuthError>;
}

/// JSON-over-HTTP transport against `{api_base}/auth/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpAuthTransport {
    api_base: String,
    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    timeout_ms: u32,
}

impl HttpAuthTransport {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self { api_base: config.api_base.clone(), timeout_ms: config.request_timeout_ms }
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        auth_endpoint(&self.api_base, path)
    }
}

#[async_trait::async_trait(?Send)]
impl AuthTransport for HttpAuthTransport {
    async fn login(&self, request: &LoginRequest<'_>) -> Result<LoginResponse, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            post_json_with_timeout(&self.endpoint(LOGIN_PATH), request, self.timeout_ms).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(AuthError::Unavailable)
        }
    }

    async fn register(&self, request: &RegisterRequest<'_>) -> Result<RegisterResponse, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            post_json_with_timeout(&self.endpoint(REGISTER_PATH), request, self.timeout_ms).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(AuthError::Unavailable)
        }
    }
}

fn auth_endpoint(api_base: &str, path: &str) -> String {
    format!("{}{path}", api_base.trim_end_matches('/'))
}

/// Pull the backend's `detail` message out of an error body, if it has one.
#[cfg(any(test, feature = "hydrate"))]
fn parse_error_detail(raw: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(raw)
        .ok()
        .map(|body| body.detail)
        .filter(|detail| !detail.trim().is_empty())
}

#[cfg(any(test, feature = "hydrate"))]
fn decode_body<R: serde::de::DeserializeOwned>(raw: &str) -> Result<R, AuthError> {
    serde_json::from_str(raw).map_err(|e| AuthError::Decode(e.to_string()))
}

#[cfg(feature = "hydrate")]
async fn post_json_with_timeout<B, R>(url: &str, body: &B, timeout_ms: u32) -> Result<R, AuthError>
where
    B: serde::Serialize,
    R: serde::de::DeserializeOwned,
{
    use futures::future::{Either, select};

    let request = post_json(url, body);
    let timeout = gloo_timers::future::TimeoutFuture::new(timeout_ms);
    futures::pin_mut!(request, timeout);
    match select(request, timeout).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            log::warn!("auth request to {url} timed out after {timeout_ms} ms");
            Err(AuthError::Timeout { after_ms: timeout_ms })
        }
    }
}

#[cfg(feature = "hydrate")]
async fn post_json<B, R>(url: &str, body: &B) -> Result<R, AuthError>
where
    B: serde::Serialize,
    R: serde::de::DeserializeOwned,
{
    // `.json()` sets `Content-Type: application/json`.
    let resp = gloo_net::http::Request::post(url)
        .json(body)
        .map_err(|e| AuthError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))?;
    let status = resp.status();
    let raw = resp.text().await.map_err(|e| AuthError::Transport(e.to_string()))?;
    if !resp.ok() {
        return Err(AuthError::Rejected { status, detail: parse_error_detail(&raw) });
    }
    decode_body(&raw)
}
