//! Wire DTOs for the Authentication Service.
//!
//! DESIGN
//! ======
//! Field names mirror the backend's JSON (`snake_case`) so serde needs no
//! renames on the HTTP boundary. The persisted session uses its own
//! camelCase projection in `state::auth`.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// An account as returned by the Authentication Service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque unique identifier.
    pub id: String,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub is_verified: bool,
    /// Server-assigned creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last server-side profile update, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login body: `{user, access_token}`.
///
/// Token-only bodies (`{access_token, token_type, expires_in}`) are also
/// accepted; `user` is then absent.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: String,
}

/// Successful register body: the new user flattened with its token.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RegisterResponse {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub access_token: String,
}

/// Error body shape used by the backend (`{"detail": "..."}`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
