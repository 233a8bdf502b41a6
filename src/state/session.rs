//! Session store: the single owner of [`AuthState`].
//!
//! DESIGN
//! ======
//! The store is an explicit object handed to the UI through context rather
//! than a module-level singleton. Transport and storage are injected so the
//! same code runs against `gloo-net`/`localStorage` in the browser and
//! against fakes in tests.
//!
//! Every mutation goes through [`SessionStore::mutate`], which persists the
//! durable projection when it changed and then notifies listeners with the
//! new snapshot. The Leptos app mirrors the store into an `RwSignal` that way.
//!
//! CONCURRENCY
//! ===========
//! At most one `login`/`register` is in flight per store. An overlapping
//! call fails immediately with [`AuthError::InFlight`]. The in-flight flag is
//! released when the running call finishes or its future is dropped.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::ClientConfig;
use crate::net::api::{AuthError, AuthTransport, HttpAuthTransport};
use crate::net::types::{LoginRequest, RegisterRequest, User};
use crate::state::auth::{AuthState, PersistedEnvelope, usable_token};
use crate::util::storage::{BrowserStorage, SessionStorage, load_json, save_json};

/// Callback run with the new snapshot after every mutation.
pub type Listener = Arc<dyn Fn(&AuthState) + Send + Sync>;

/// The store as wired in the browser app.
pub type AppSessionStore = SessionStore<HttpAuthTransport, BrowserStorage>;

pub struct SessionStore<T, S> {
    state: Mutex<AuthState>,
    transport: T,
    storage: S,
    storage_key: String,
    in_flight: AtomicBool,
    listeners: Mutex<Vec<Listener>>,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T, S> SessionStore<T, S>
where
    T: AuthTransport,
    S: SessionStorage,
{
    /// Create a store seeded from the durable slot named by
    /// `config.storage_key`. Missing, corrupt, or foreign-version data
    /// yields the empty initial state.
    pub fn restore(config: &ClientConfig, transport: T, storage: S) -> Self {
        let persisted = load_json::<PersistedEnvelope, _>(&storage, &config.storage_key)
            .and_then(PersistedEnvelope::into_current);
        match &persisted {
            Some(p) => log::info!(
                "restored session (token: {}, user: {})",
                p.access_token.is_some(),
                p.user.as_ref().map_or("-", |u| u.id.as_str())
            ),
            None => log::info!("no stored session under {}", config.storage_key),
        }

        Self {
            state: Mutex::new(AuthState::hydrate(persisted)),
            transport,
            storage,
            storage_key: config.storage_key.clone(),
            in_flight: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Current state by value.
    pub fn snapshot(&self) -> AuthState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Register a change listener. Listeners run outside every store lock,
    /// so they may call back into the store.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    /// Exchange credentials for a session.
    ///
    /// On success the user, token, and authenticated flag are set together.
    /// On any failure only `is_loading` changes.
    ///
    /// # Errors
    ///
    /// Returns the transport's [`AuthError`], [`AuthError::MissingToken`] for
    /// a 2xx body without a token, or [`AuthError::InFlight`] if another
    /// sign-in is pending.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let _guard = self.begin_request()?;
        let result = self
            .transport
            .login(&LoginRequest { email, password })
            .await
            .and_then(|resp| Ok((resp.user, require_token(resp.access_token)?)));
        self.finish("login", result)
    }

    /// Create an account and sign into it.
    ///
    /// # Errors
    ///
    /// Same as [`SessionStore::login`].
    pub async fn register(&self, email: &str, username: &str, password: &str) -> Result<(), AuthError> {
        let _guard = self.begin_request()?;
        let result = self
            .transport
            .register(&RegisterRequest { email, username, password })
            .await
            .and_then(|resp| Ok((Some(resp.user), require_token(resp.access_token)?)));
        self.finish("register", result)
    }

    /// Drop the session locally. No network call; idempotent.
    pub fn logout(&self) {
        self.mutate(AuthState::sign_out);
        log::info!("signed out");
    }

    /// Settle the startup phase from local token presence alone.
    pub fn check_auth(&self) {
        self.mutate(AuthState::check);
        log::debug!("check_auth settled: authenticated={}", self.snapshot().is_authenticated);
    }

    fn begin_request(&self) -> Result<InFlightGuard<'_>, AuthError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            log::warn!("rejecting overlapping sign-in request");
            self.mutate(AuthState::settle_failure);
            return Err(AuthError::InFlight);
        }
        Ok(InFlightGuard(&self.in_flight))
    }

    fn finish(&self, op: &str, result: Result<(Option<User>, String), AuthError>) -> Result<(), AuthError> {
        match result {
            Ok((user, token)) => {
                log::info!("{op} succeeded for {}", user.as_ref().map_or("<unknown user>", |u| u.email.as_str()));
                self.mutate(|state| state.sign_in(user, token));
                Ok(())
            }
            Err(e) => {
                log::warn!("{op} failed: {e}");
                self.mutate(AuthState::settle_failure);
                Err(e)
            }
        }
    }

    fn mutate<F>(&self, apply: F)
    where
        F: FnOnce(&mut AuthState),
    {
        let (changed, snapshot) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let before = state.persisted();
            apply(&mut state);
            (before != state.persisted(), state.clone())
        };
        if changed {
            self.persist(&snapshot);
        }
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner).clone();
        for listener in &listeners {
            listener(&snapshot);
        }
    }

    fn persist(&self, state: &AuthState) {
        let envelope = PersistedEnvelope::new(state.persisted());
        if let Err(e) = save_json(&self.storage, &self.storage_key, &envelope) {
            log::warn!("failed to persist session: {e}");
        }
    }
}

fn require_token(token: String) -> Result<String, AuthError> {
    if usable_token(&token) { Ok(token) } else { Err(AuthError::MissingToken) }
}
