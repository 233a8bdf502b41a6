//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route gate and user-aware components; mutated only through
//! `state::session::SessionStore`. The durable projection is the
//! `{user, accessToken, isAuthenticated}` subset; `is_loading` never leaves
//! memory.
//!
//! INVARIANTS
//! ==========
//! `is_authenticated` implies a usable `access_token`. Transitions and
//! hydration both preserve this; an empty or blank token counts as absent.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::{Deserialize, Serialize};

use crate::net::types::User;

/// A token is usable when it has any non-whitespace content.
#[must_use]
pub fn usable_token(token: &str) -> bool {
    !token.trim().is_empty()
}

/// Version tag written alongside the persisted projection.
pub const PERSIST_VERSION: u32 = 0;

/// Authentication state tracking the current user, token, and loading status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { user: None, access_token: None, is_authenticated: false, is_loading: true }
    }
}

/// Coarse session phase the route gate switches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Startup, before `check_auth` has settled the session.
    Initializing,
    Unauthenticated,
    Authenticated,
}

/// Durable projection of [`AuthState`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAuth {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

/// On-disk wrapper: `{"state": {...}, "version": 0}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEnvelope {
    pub state: PersistedAuth,
    #[serde(default)]
    pub version: u32,
}

impl PersistedEnvelope {
    #[must_use]
    pub fn new(state: PersistedAuth) -> Self {
        Self { state, version: PERSIST_VERSION }
    }

    /// Unwrap the projection if it was written by a compatible version.
    #[must_use]
    pub fn into_current(self) -> Option<PersistedAuth> {
        (self.version == PERSIST_VERSION).then_some(self.state)
    }
}

impl AuthState {
    /// Initial state from an optional persisted projection.
    ///
    /// Always starts loading. A persisted `isAuthenticated` without a usable
    /// token is downgraded to unauthenticated.
    #[must_use]
    pub fn hydrate(persisted: Option<PersistedAuth>) -> Self {
        let Some(persisted) = persisted else {
            return Self::default();
        };
        let access_token = persisted.access_token.filter(|t| usable_token(t));
        let is_authenticated = persisted.is_authenticated && access_token.is_some();
        Self { user: persisted.user, access_token, is_authenticated, is_loading: true }
    }

    /// The durable subset of this state.
    #[must_use]
    pub fn persisted(&self) -> PersistedAuth {
        PersistedAuth {
            user: self.user.clone(),
            access_token: self.access_token.clone(),
            is_authenticated: self.is_authenticated,
        }
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.access_token.as_deref().is_some_and(usable_token)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Initializing
        } else if self.is_authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    /// Confirmed login/register. `token` must be non-empty; callers reject
    /// empty tokens before getting here.
    pub fn sign_in(&mut self, user: Option<User>, token: String) {
        debug_assert!(usable_token(&token));
        self.user = user;
        self.access_token = Some(token);
        self.is_authenticated = true;
        self.is_loading = false;
    }

    /// Failed login/register: only the loading flag moves.
    pub fn settle_failure(&mut self) {
        self.is_loading = false;
    }

    pub fn sign_out(&mut self) {
        self.user = None;
        self.access_token = None;
        self.is_authenticated = false;
        self.is_loading = false;
    }

    /// Trust local token presence; no expiry or signature check.
    pub fn check(&mut self) {
        self.is_authenticated = self.has_token();
        self.is_loading = false;
    }
}
