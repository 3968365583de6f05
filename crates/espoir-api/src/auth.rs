// Auth service HTTP client
//
// Token-based login and registration. The service returns a `UserRecord`
// carrying the session token; persisting it is the caller's concern.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::UserRecord;
use crate::transport::TransportConfig;

/// HTTP client for the auth service.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    /// Create a new auth client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create an auth client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The auth service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Authenticate an existing account.
    ///
    /// `POST /auth/login` with `{ "email": ..., "password": ... }`.
    /// A 401/403 response maps to [`Error::Authentication`].
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<UserRecord, Error> {
        let url = self.endpoint("auth/login")?;
        debug!("logging in at {url}");
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        self.post_account(url, &body).await
    }

    /// Create a new account.
    ///
    /// `POST /auth/register` with `{ "username": ..., "email": ..., "password": ... }`.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<UserRecord, Error> {
        let url = self.endpoint("auth/register")?;
        debug!("registering at {url}");
        let body = json!({
            "username": username,
            "email": email,
            "password": password.expose_secret(),
        });
        self.post_account(url, &body).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    async fn post_account(
        &self,
        url: Url,
        body: &serde_json::Value,
    ) -> Result<UserRecord, Error> {
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = resp.text().await.unwrap_or_default();
            let message = extract_message(&body)
                .unwrap_or_else(|| "credentials rejected".to_owned());
            return Err(Error::Authentication { message });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: body,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// Pull a human-readable message out of an `{ "message": ... }` error body.
fn extract_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }
    serde_json::from_str::<ErrorBody>(body).ok()?.message
}
