use super::*;
use crate::net::types::{LoginResponse, RegisterResponse};
use crate::state::auth::{PersistedAuth, SessionPhase, usable_token};
use crate::util::storage::MemoryStorage;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::oneshot;

// =========================================================================
// MockTransport
// =========================================================================

#[derive(Default)]
struct MockTransport {
    logins: Mutex<VecDeque<Result<LoginResponse, AuthError>>>,
    registrations: Mutex<VecDeque<Result<RegisterResponse, AuthError>>>,
    calls: Mutex<Vec<String>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MockTransport {
    fn with_login(result: Result<LoginResponse, AuthError>) -> Self {
        let transport = Self::default();
        transport.logins.lock().unwrap().push_back(result);
        transport
    }

    fn with_register(result: Result<RegisterResponse, AuthError>) -> Self {
        let transport = Self::default();
        transport.registrations.lock().unwrap().push_back(result);
        transport
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn wait_for_gate(&self) {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait::async_trait(?Send)]
impl AuthTransport for MockTransport {
    async fn login(&self, request: &LoginRequest<'_>) -> Result<LoginResponse, AuthError> {
        self.calls.lock().unwrap().push(format!("login:{}", request.email));
        self.wait_for_gate().await;
        let next = self.logins.lock().unwrap().pop_front();
        next.unwrap_or(Err(AuthError::Rejected { status: 401, detail: None }))
    }

    async fn register(&self, request: &RegisterRequest<'_>) -> Result<RegisterResponse, AuthError> {
        self.calls.lock().unwrap().push(format!("register:{}:{}", request.email, request.username));
        self.wait_for_gate().await;
        let next = self.registrations.lock().unwrap().pop_front();
        next.unwrap_or(Err(AuthError::Rejected { status: 400, detail: None }))
    }
}

// =========================================================================
// Helpers
// =========================================================================

const KEY: &str = "auth-storage";

fn user(id: &str, email: &str) -> User {
    User {
        id: id.to_owned(),
        email: email.to_owned(),
        username: "alice".to_owned(),
        is_active: true,
        is_verified: false,
        created_at: "2024-01-01T00:00:00".to_owned(),
        updated_at: None,
    }
}

fn login_ok(id: &str, token: &str) -> Result<LoginResponse, AuthError> {
    Ok(LoginResponse { user: Some(user(id, "a@b.com")), access_token: token.to_owned() })
}

fn store_with(transport: MockTransport) -> (SessionStore<MockTransport, Arc<MemoryStorage>>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::restore(&ClientConfig::default(), transport, Arc::clone(&storage));
    (store, storage)
}

fn seeded_store(transport: MockTransport, persisted: &PersistedAuth) -> (SessionStore<MockTransport, Arc<MemoryStorage>>, Arc<MemoryStorage>) {
    let raw = serde_json::to_string(&PersistedEnvelope::new(persisted.clone())).unwrap();
    let storage = Arc::new(MemoryStorage::with_value(KEY, &raw));
    let store = SessionStore::restore(&ClientConfig::default(), transport, Arc::clone(&storage));
    (store, storage)
}

fn signed_in_snapshot() -> PersistedAuth {
    PersistedAuth {
        user: Some(user("9", "old@b.com")),
        access_token: Some("old-token".to_owned()),
        is_authenticated: true,
    }
}

fn stored_state(storage: &MemoryStorage) -> PersistedAuth {
    let raw = storage.get(KEY).expect("session persisted");
    let envelope: PersistedEnvelope = serde_json::from_str(&raw).unwrap();
    assert_eq!(envelope.version, 0);
    envelope.state
}

fn assert_token_invariant(state: &AuthState) {
    if state.is_authenticated {
        assert!(state.access_token.as_deref().is_some_and(usable_token));
    }
}

// =========================================================================
// restore
// =========================================================================

#[test]
fn restore_without_storage_starts_initializing() {
    let (store, storage) = store_with(MockTransport::default());
    assert_eq!(store.snapshot(), AuthState::default());
    assert_eq!(storage.writes(), 0);
}

#[test]
fn restore_reads_persisted_session() {
    let (store, _) = seeded_store(MockTransport::default(), &signed_in_snapshot());
    let state = store.snapshot();
    assert_eq!(state.access_token.as_deref(), Some("old-token"));
    assert!(state.is_authenticated);
    assert!(state.is_loading);
}

#[test]
fn restore_fails_open_on_corrupt_storage() {
    let storage = Arc::new(MemoryStorage::with_value(KEY, "{\"state\": [1, 2"));
    let store = SessionStore::restore(&ClientConfig::default(), MockTransport::default(), storage);
    assert_eq!(store.snapshot(), AuthState::default());
}

#[test]
fn restore_uses_configured_storage_key() {
    let raw = serde_json::to_string(&PersistedEnvelope::new(signed_in_snapshot())).unwrap();
    let storage = Arc::new(MemoryStorage::with_value("kb-session", &raw));
    let config = ClientConfig { storage_key: "kb-session".to_owned(), ..ClientConfig::default() };
    let store = SessionStore::restore(&config, MockTransport::default(), storage);
    assert!(store.snapshot().has_token());
}

// =========================================================================
// login
// =========================================================================

#[tokio::test]
async fn login_success_sets_session() {
    let (store, storage) = store_with(MockTransport::with_login(login_ok("1", "tok1")));
    store.login("a@b.com", "pw").await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.user.as_ref().unwrap().id, "1");
    assert_eq!(state.access_token.as_deref(), Some("tok1"));
    assert!(state.is_authenticated);
    assert!(!state.is_loading);

    let stored = stored_state(&storage);
    assert_eq!(stored.access_token.as_deref(), Some("tok1"));
    assert!(stored.is_authenticated);
}

#[tokio::test]
async fn login_sends_credentials_to_transport() {
    let (store, _) = store_with(MockTransport::with_login(login_ok("1", "tok1")));
    store.login("a@b.com", "pw").await.unwrap();
    assert_eq!(store.transport.calls(), vec!["login:a@b.com".to_owned()]);
}

#[tokio::test]
async fn login_rejected_leaves_auth_fields_untouched() {
    let transport = MockTransport::with_login(Err(AuthError::Rejected {
        status: 401,
        detail: Some("Invalid email or password".to_owned()),
    }));
    let (store, storage) = seeded_store(transport, &signed_in_snapshot());
    let before = store.snapshot();

    let err = store.login("a@b.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected { status: 401, .. }));

    let after = store.snapshot();
    assert!(!after.is_loading);
    assert_eq!(after.persisted(), before.persisted());
    assert_eq!(storage.writes(), 0);
}

#[tokio::test]
async fn login_failure_from_empty_state_stays_unauthenticated() {
    let (store, _) = store_with(MockTransport::with_login(Err(AuthError::Transport("offline".to_owned()))));
    let err = store.login("a@b.com", "pw").await.unwrap_err();
    assert_eq!(err, AuthError::Transport("offline".to_owned()));

    let state = store.snapshot();
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    assert!(!state.is_loading);
    assert_eq!(state.phase(), SessionPhase::Unauthenticated);
}

#[tokio::test]
async fn login_without_token_is_missing_token() {
    let (store, _) = store_with(MockTransport::with_login(Ok(LoginResponse {
        user: Some(user("1", "a@b.com")),
        access_token: String::new(),
    })));
    let err = store.login("a@b.com", "pw").await.unwrap_err();
    assert_eq!(err, AuthError::MissingToken);
    assert!(!store.snapshot().is_authenticated);
}

#[tokio::test]
async fn login_token_only_response_authenticates_without_user() {
    let (store, _) = store_with(MockTransport::with_login(Ok(LoginResponse {
        user: None,
        access_token: "tok1".to_owned(),
    })));
    store.login("a@b.com", "pw").await.unwrap();
    let state = store.snapshot();
    assert!(state.is_authenticated);
    assert!(state.user.is_none());
    assert_eq!(state.access_token.as_deref(), Some("tok1"));
}

#[tokio::test]
async fn overlapping_login_is_rejected_in_flight() {
    let (tx, rx) = oneshot::channel();
    let transport = MockTransport::with_login(login_ok("1", "tok1"));
    *transport.gate.lock().unwrap() = Some(rx);
    let (store, _) = store_with(transport);

    let first = store.login("a@b.com", "pw");
    let second = async {
        tokio::task::yield_now().await;
        let result = store.login("b@b.com", "pw").await;
        let _ = tx.send(());
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err(), AuthError::InFlight);
    assert_eq!(store.transport.calls(), vec!["login:a@b.com".to_owned()]);
    assert_eq!(store.snapshot().access_token.as_deref(), Some("tok1"));
}

#[tokio::test]
async fn in_flight_flag_released_after_failure() {
    let transport = MockTransport::default();
    transport.logins.lock().unwrap().push_back(Err(AuthError::Rejected { status: 401, detail: None }));
    transport.logins.lock().unwrap().push_back(login_ok("1", "tok1"));
    let (store, _) = store_with(transport);

    assert!(store.login("a@b.com", "bad").await.is_err());
    store.login("a@b.com", "pw").await.unwrap();
    assert!(store.snapshot().is_authenticated);
}

// =========================================================================
// register
// =========================================================================

#[tokio::test]
async fn register_success_uses_flat_body_as_user() {
    let (store, storage) = store_with(MockTransport::with_register(Ok(RegisterResponse {
        user: user("2", "new@b.com"),
        access_token: "tok2".to_owned(),
    })));
    store.register("new@b.com", "alice", "longenough").await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.user.as_ref().unwrap().email, "new@b.com");
    assert_eq!(state.access_token.as_deref(), Some("tok2"));
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(store.transport.calls(), vec!["register:new@b.com:alice".to_owned()]);
    assert!(stored_state(&storage).is_authenticated);
}

#[tokio::test]
async fn register_rejected_propagates_and_settles_loading() {
    let (store, _) = store_with(MockTransport::with_register(Err(AuthError::Rejected {
        status: 400,
        detail: Some("Email already registered".to_owned()),
    })));
    let err = store.register("a@b.com", "alice", "longenough").await.unwrap_err();
    assert_eq!(err.to_string(), "request rejected (400): Email already registered");
    let state = store.snapshot();
    assert!(!state.is_loading);
    assert!(!state.is_authenticated);
}

#[tokio::test]
async fn register_without_token_is_missing_token() {
    let (store, _) = store_with(MockTransport::with_register(Ok(RegisterResponse {
        user: user("2", "new@b.com"),
        access_token: "  ".to_owned(),
    })));
    assert_eq!(store.register("new@b.com", "alice", "longenough").await.unwrap_err(), AuthError::MissingToken);
    assert!(store.snapshot().user.is_none());
}

// =========================================================================
// logout / check_auth
// =========================================================================

#[test]
fn logout_clears_session_and_is_idempotent() {
    let (store, storage) = seeded_store(MockTransport::default(), &signed_in_snapshot());
    let cleared = AuthState { user: None, access_token: None, is_authenticated: false, is_loading: false };

    store.logout();
    assert_eq!(store.snapshot(), cleared);
    assert_eq!(stored_state(&storage), PersistedAuth::default());
    assert_eq!(storage.writes(), 1);

    store.logout();
    assert_eq!(store.snapshot(), cleared);
    assert_eq!(storage.writes(), 1);
    assert!(store.transport.calls().is_empty());
}

#[test]
fn check_auth_with_stored_token_authenticates() {
    let mut persisted = signed_in_snapshot();
    persisted.is_authenticated = false;
    let (store, storage) = seeded_store(MockTransport::default(), &persisted);

    store.check_auth();
    let state = store.snapshot();
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert!(stored_state(&storage).is_authenticated);
    assert!(store.transport.calls().is_empty());
}

#[test]
fn check_auth_without_token_is_unauthenticated() {
    let (store, storage) = store_with(MockTransport::default());
    store.check_auth();
    let state = store.snapshot();
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(storage.writes(), 0);
}

#[test]
fn check_auth_is_stable_across_repeats() {
    let (store, _) = seeded_store(MockTransport::default(), &signed_in_snapshot());
    store.check_auth();
    let first = store.snapshot().is_authenticated;
    store.check_auth();
    assert_eq!(store.snapshot().is_authenticated, first);
}

// =========================================================================
// listeners and invariants
// =========================================================================

#[tokio::test]
async fn listeners_see_every_mutation() {
    let (store, _) = store_with(MockTransport::with_login(login_ok("1", "tok1")));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |state| sink.lock().unwrap().push((state.is_authenticated, state.is_loading)));

    store.check_auth();
    store.login("a@b.com", "pw").await.unwrap();
    store.logout();

    assert_eq!(*seen.lock().unwrap(), vec![(false, false), (true, false), (false, false)]);
}

#[tokio::test]
async fn token_invariant_holds_across_operation_sequence() {
    let transport = MockTransport::default();
    transport.logins.lock().unwrap().push_back(login_ok("1", "tok1"));
    transport.logins.lock().unwrap().push_back(Err(AuthError::Rejected { status: 401, detail: None }));
    transport.logins.lock().unwrap().push_back(Ok(LoginResponse { user: None, access_token: String::new() }));
    let (store, _) = store_with(transport);

    assert_token_invariant(&store.snapshot());
    store.check_auth();
    assert_token_invariant(&store.snapshot());
    let _ = store.login("a@b.com", "pw").await;
    assert_token_invariant(&store.snapshot());
    let _ = store.login("a@b.com", "pw").await;
    assert_token_invariant(&store.snapshot());
    store.logout();
    assert_token_invariant(&store.snapshot());
    let _ = store.login("a@b.com", "pw").await;
    assert_token_invariant(&store.snapshot());
    store.check_auth();
    assert_token_invariant(&store.snapshot());
}

#[test]
fn check_auth_with_blank_persisted_token_is_unauthenticated() {
    let persisted = PersistedAuth { user: None, access_token: Some("   ".to_owned()), is_authenticated: true };
    let (store, _) = seeded_store(MockTransport::default(), &persisted);

    store.check_auth();
    let state = store.snapshot();
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert_token_invariant(&state);
}

#[test]
fn listener_may_call_back_into_store() {
    let (store, _) = seeded_store(MockTransport::default(), &signed_in_snapshot());
    let store = Arc::new(store);
    let weak = Arc::downgrade(&store);
    store.subscribe(move |state| {
        if state.is_authenticated {
            if let Some(store) = weak.upgrade() {
                store.logout();
            }
        }
    });

    store.check_auth();
    let state = store.snapshot();
    assert!(!state.is_authenticated);
    assert!(state.access_token.is_none());
}
