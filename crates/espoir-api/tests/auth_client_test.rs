// Integration tests for `AuthClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use espoir_api::{AuthClient, Error};

async fn setup() -> (MockServer, AuthClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let client = AuthClient::with_client(reqwest::Client::new(), base);
    (server, client)
}

#[tokio::test]
async fn login_returns_user_record() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "a@b.com",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1",
            "username": "a",
            "email": "a@b.com",
            "token": "t1",
        })))
        .mount(&server)
        .await;

    let user = client
        .login("a@b.com", &SecretString::from("hunter2"))
        .await
        .unwrap();

    assert_eq!(user.id, "1");
    assert_eq!(user.username, "a");
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.token, "t1");
}

#[tokio::test]
async fn rejected_login_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "invalid credentials",
        })))
        .mount(&server)
        .await;

    let err = client
        .login("a@b.com", &SecretString::from("wrong"))
        .await
        .unwrap_err();

    match err {
        Error::Authentication { message } => assert_eq!(message, "invalid credentials"),
        other => panic!("expected Authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn register_posts_username_and_returns_record() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "username": "newbie",
            "email": "new@b.com",
            "password": "s3cret",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "9",
            "username": "newbie",
            "email": "new@b.com",
            "token": "t9",
        })))
        .mount(&server)
        .await;

    let user = client
        .register("newbie", "new@b.com", &SecretString::from("s3cret"))
        .await
        .unwrap();

    assert_eq!(user.username, "newbie");
    assert_eq!(user.token, "t9");
}

#[tokio::test]
async fn server_error_maps_to_api() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client
        .login("a@b.com", &SecretString::from("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 500, .. }));
}
