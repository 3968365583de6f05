// Behavioral tests for `SessionStore` through the container, using
// wiremock for the auth boundary and the in-memory storage backend.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use espoir_api::{AuthClient, CatalogClient};
use espoir_core::{
    AppStateContainer, CoreError, Intent, MemoryBackend, PersistenceGateway, SessionPhase,
    StorageBackend, StorageError, User,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn container_over(server: &MockServer, backend: Arc<dyn StorageBackend>) -> AppStateContainer {
    let base = Url::parse(&server.uri()).expect("server uri");
    let auth = Arc::new(AuthClient::with_client(reqwest::Client::new(), base.clone()));
    let catalog = Arc::new(CatalogClient::with_client(
        reqwest::Client::new(),
        base,
        Url::parse("https://images.example.com/w500").expect("image url"),
        SecretString::from("test-key"),
    ));
    AppStateContainer::new(auth, catalog, Arc::new(PersistenceGateway::new(backend)))
}

fn user_body(id: &str, username: &str, email: &str, token: &str) -> serde_json::Value {
    json!({ "id": id, "username": username, "email": email, "token": token })
}

fn login_intent(email: &str, password: &str) -> Intent {
    Intent::Login {
        email: email.to_owned(),
        password: SecretString::from(password),
    }
}

async fn mount_login(server: &MockServer, email: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": email, "password": "x" })))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Backend whose writes always fail; reads behave as absent.
struct FailingBackend;

#[async_trait::async_trait]
impl StorageBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk full")))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk full")))
    }
}

// ── Login / register ────────────────────────────────────────────────

#[tokio::test]
async fn login_establishes_and_persists_session() {
    let server = MockServer::start().await;
    let backend = Arc::new(MemoryBackend::new());
    let container = container_over(&server, backend.clone());

    mount_login(
        &server,
        "a@b.com",
        ResponseTemplate::new(200).set_body_json(user_body("1", "a", "a@b.com", "t1")),
    )
    .await;

    container
        .dispatch(login_intent("a@b.com", "x"))
        .await
        .expect("login dispatch");

    let state = container.snapshot();
    let user = state.session.phase.user().expect("authenticated");
    assert_eq!(user.id, "1");
    assert_eq!(user.username, "a");
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.session_token, "t1");
    assert!(!state.session.loading);
    assert!(state.session.error.is_none());

    // The persisted record equals the established user.
    let probe = PersistenceGateway::new(backend);
    let persisted = probe.load_user().await.expect("persisted user");
    assert_eq!(persisted, **user);
}

#[tokio::test]
async fn failed_login_records_error_and_keeps_existing_session() {
    let server = MockServer::start().await;
    let backend = Arc::new(MemoryBackend::new());
    let container = container_over(&server, backend);

    mount_login(
        &server,
        "a@b.com",
        ResponseTemplate::new(200).set_body_json(user_body("1", "a", "a@b.com", "t1")),
    )
    .await;
    mount_login(
        &server,
        "b@c.com",
        ResponseTemplate::new(401).set_body_json(json!({ "message": "invalid credentials" })),
    )
    .await;

    container
        .dispatch(login_intent("a@b.com", "x"))
        .await
        .expect("first login");
    container
        .dispatch(login_intent("b@c.com", "x"))
        .await
        .expect("second login dispatch is Ok; failure lands in state");

    let state = container.snapshot();
    // The earlier session survives the failed re-login.
    assert_eq!(
        state.session.phase.user().map(|u| u.id.as_str()),
        Some("1")
    );
    assert!(!state.session.loading);
    assert!(
        state
            .session
            .error
            .as_deref()
            .is_some_and(|e| e.contains("invalid credentials"))
    );
}

#[tokio::test]
async fn empty_credentials_rejected_before_any_io() {
    let server = MockServer::start().await;
    let container = container_over(&server, Arc::new(MemoryBackend::new()));

    let err = container
        .dispatch(login_intent("a@b.com", ""))
        .await
        .expect_err("validation should fail");
    assert!(matches!(err, CoreError::Validation { .. }));

    // Nothing was dispatched to the auth service and nothing published.
    assert!(
        server
            .received_requests()
            .await
            .is_none_or(|reqs| reqs.is_empty())
    );
    assert_eq!(container.version(), 0);
}

#[tokio::test]
async fn register_establishes_session() {
    let server = MockServer::start().await;
    let container = container_over(&server, Arc::new(MemoryBackend::new()));

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(user_body("9", "newbie", "n@b.com", "t9")),
        )
        .mount(&server)
        .await;

    container
        .dispatch(Intent::Register {
            username: "newbie".into(),
            email: "n@b.com".into(),
            password: SecretString::from("x"),
        })
        .await
        .expect("register dispatch");

    let state = container.snapshot();
    assert!(state.session.phase.is_authenticated());
    assert_eq!(
        state.session.phase.user().map(|u| u.username.as_str()),
        Some("newbie")
    );
}

#[tokio::test]
async fn superseded_login_result_is_discarded() {
    let server = MockServer::start().await;
    let container = container_over(&server, Arc::new(MemoryBackend::new()));

    // The first login settles last; the second supersedes it.
    mount_login(
        &server,
        "slow@b.com",
        ResponseTemplate::new(200)
            .set_body_json(user_body("1", "slow", "slow@b.com", "t-slow"))
            .set_delay(Duration::from_millis(200)),
    )
    .await;
    mount_login(
        &server,
        "fast@b.com",
        ResponseTemplate::new(200).set_body_json(user_body("2", "fast", "fast@b.com", "t-fast")),
    )
    .await;

    let slow = container.dispatch(login_intent("slow@b.com", "x"));
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        container.dispatch(login_intent("fast@b.com", "x")).await
    };
    let (slow_res, fast_res) = tokio::join!(slow, fast);
    slow_res.expect("slow dispatch");
    fast_res.expect("fast dispatch");

    // Last-issued wins even though it settled first.
    let state = container.snapshot();
    assert_eq!(
        state.session.phase.user().map(|u| u.username.as_str()),
        Some("fast")
    );
}

#[tokio::test]
async fn unpersistable_session_is_surfaced_not_established() {
    let server = MockServer::start().await;
    let container = container_over(&server, Arc::new(FailingBackend));

    mount_login(
        &server,
        "a@b.com",
        ResponseTemplate::new(200).set_body_json(user_body("1", "a", "a@b.com", "t1")),
    )
    .await;

    let err = container
        .dispatch(login_intent("a@b.com", "x"))
        .await
        .expect_err("persistence failure must surface");
    assert!(matches!(err, CoreError::Persistence { .. }));

    let state = container.snapshot();
    assert!(!state.session.phase.is_authenticated());
    assert!(state.session.error.is_some());
    assert!(!state.session.loading);
}

// ── Restore / logout ────────────────────────────────────────────────

#[tokio::test]
async fn restore_with_persisted_record_authenticates() {
    let server = MockServer::start().await;
    let backend = Arc::new(MemoryBackend::new());

    let stored = User {
        id: "1".into(),
        username: "a".into(),
        email: "a@b.com".into(),
        session_token: "t1".into(),
    };
    PersistenceGateway::new(backend.clone())
        .save_user(&stored)
        .await
        .expect("seed user");

    let container = container_over(&server, backend);
    assert_eq!(container.snapshot().session.phase, SessionPhase::Unknown);

    container
        .dispatch(Intent::LoadPersistedSession)
        .await
        .expect("restore");

    let state = container.snapshot();
    assert_eq!(state.session.phase.user().map(|u| (**u).clone()), Some(stored));
    assert!(!state.session.loading);
}

#[tokio::test]
async fn restore_without_record_is_unauthenticated() {
    let server = MockServer::start().await;
    let container = container_over(&server, Arc::new(MemoryBackend::new()));

    container
        .dispatch(Intent::LoadPersistedSession)
        .await
        .expect("restore");

    let state = container.snapshot();
    assert_eq!(state.session.phase, SessionPhase::Unauthenticated);
    assert!(!state.session.loading);
}

#[tokio::test]
async fn logout_clears_memory_and_storage() {
    let server = MockServer::start().await;
    let backend = Arc::new(MemoryBackend::new());
    let container = container_over(&server, backend.clone());

    mount_login(
        &server,
        "a@b.com",
        ResponseTemplate::new(200).set_body_json(user_body("1", "a", "a@b.com", "t1")),
    )
    .await;
    container
        .dispatch(login_intent("a@b.com", "x"))
        .await
        .expect("login");

    container.dispatch(Intent::Logout).await.expect("logout");

    let state = container.snapshot();
    assert_eq!(state.session.phase, SessionPhase::Unauthenticated);
    assert!(state.session.error.is_none());
    assert!(
        PersistenceGateway::new(backend).load_user().await.is_none(),
        "persisted record removed"
    );
}

#[tokio::test]
async fn logout_succeeds_even_when_delete_fails() {
    let server = MockServer::start().await;
    let container = container_over(&server, Arc::new(FailingBackend));

    container.dispatch(Intent::Logout).await.expect("logout");

    let state = container.snapshot();
    assert_eq!(state.session.phase, SessionPhase::Unauthenticated);
    assert!(!state.session.loading);
}

#[tokio::test]
async fn clear_error_touches_only_the_error_field() {
    let server = MockServer::start().await;
    let container = container_over(&server, Arc::new(MemoryBackend::new()));

    mount_login(
        &server,
        "a@b.com",
        ResponseTemplate::new(401).set_body_json(json!({ "message": "nope" })),
    )
    .await;
    container
        .dispatch(login_intent("a@b.com", "x"))
        .await
        .expect("failed login dispatch");
    assert!(container.snapshot().session.error.is_some());

    let before = container.snapshot();
    container
        .dispatch(Intent::ClearError)
        .await
        .expect("clear error");

    let after = container.snapshot();
    assert!(after.session.error.is_none());
    assert_eq!(after.session.phase, before.session.phase);
    assert_eq!(after.favorites, before.favorites);
    assert_eq!(after.catalog, before.catalog);
}
