// ── Session store ──
//
// Owns the authentication slice. Login, register, and logout are
// generation-tagged: issuing any of them supersedes those still in
// flight, so a late-settling earlier call can never overwrite a newer
// session (last-issued wins, not last-settled).

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use espoir_api::AuthClient;

use super::{Generation, StateCell};
use crate::error::CoreError;
use crate::model::User;
use crate::state::SessionPhase;
use crate::storage::PersistenceGateway;

pub struct SessionStore {
    state: Arc<StateCell>,
    auth: Arc<AuthClient>,
    gateway: Arc<PersistenceGateway>,
    generation: Generation,
}

impl SessionStore {
    pub(crate) fn new(
        state: Arc<StateCell>,
        auth: Arc<AuthClient>,
        gateway: Arc<PersistenceGateway>,
    ) -> Self {
        Self {
            state,
            auth,
            gateway,
            generation: Generation::new(),
        }
    }

    /// Authenticate an existing account and establish the session.
    ///
    /// Empty credentials are rejected before any I/O. A rejected login
    /// lands in the `error` field and leaves any existing session intact;
    /// a session that cannot be persisted is not established at all.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), CoreError> {
        require("email", email)?;
        require("password", password.expose_secret())?;

        let tag = self.begin_attempt();
        match self.auth.login(email, password).await {
            Ok(record) => self.establish(tag, record.into()).await,
            Err(err) => {
                self.fail(tag, err);
                Ok(())
            }
        }
    }

    /// Create an account and establish the session. Same contract as
    /// [`login`](Self::login).
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), CoreError> {
        require("username", username)?;
        require("email", email)?;
        require("password", password.expose_secret())?;

        let tag = self.begin_attempt();
        match self.auth.register(username, email, password).await {
            Ok(record) => self.establish(tag, record.into()).await,
            Err(err) => {
                self.fail(tag, err);
                Ok(())
            }
        }
    }

    /// Restore the persisted session, if any.
    ///
    /// Leaves `Unknown` for `Authenticated` or `Unauthenticated`; a read
    /// failure degrades to "no session". The container awaits this during
    /// bootstrap so the presentation layer can route on the result.
    pub async fn load_persisted(&self) {
        self.state.apply(|state| {
            let mut next = state.clone();
            next.session.loading = true;
            next
        });

        let user = self.gateway.load_user().await;

        self.state.apply(move |state| {
            let mut next = state.clone();
            next.session.phase = match user {
                Some(user) => SessionPhase::Authenticated(Arc::new(user)),
                None => SessionPhase::Unauthenticated,
            };
            next.session.loading = false;
            next
        });
    }

    /// End the session. Always succeeds locally -- a failed persistence
    /// delete is logged, not surfaced.
    pub async fn logout(&self) {
        // Supersede any in-flight login/register so its result is dropped.
        self.generation.supersede();

        self.state.apply(|state| {
            let mut next = state.clone();
            next.session.loading = true;
            next
        });

        if let Err(err) = self.gateway.clear_user().await {
            warn!(error = %err, "failed to remove persisted session (non-fatal)");
        }

        self.state.apply(|state| {
            let mut next = state.clone();
            next.session.phase = SessionPhase::Unauthenticated;
            next.session.loading = false;
            next.session.error = None;
            next
        });
    }

    /// Clear the error field only.
    pub fn clear_error(&self) {
        self.state.apply(|state| {
            let mut next = state.clone();
            next.session.error = None;
            next
        });
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Tag a new attempt and publish its pending transition.
    fn begin_attempt(&self) -> u64 {
        let tag = self.generation.begin();
        self.state.apply(|state| {
            let mut next = state.clone();
            next.session.loading = true;
            next.session.error = None;
            next
        });
        tag
    }

    /// Persist and publish an authenticated session, unless superseded.
    async fn establish(&self, tag: u64, user: User) -> Result<(), CoreError> {
        if !self.generation.is_current(tag) {
            debug!("discarding superseded login result");
            return Ok(());
        }

        if let Err(err) = self.gateway.save_user(&user).await {
            // A session that cannot be persisted is not established.
            let message = err.to_string();
            if self.generation.is_current(tag) {
                let message = message.clone();
                self.state.apply(move |state| {
                    let mut next = state.clone();
                    next.session.loading = false;
                    next.session.error = Some(message);
                    next
                });
            }
            return Err(CoreError::Persistence { message });
        }

        if !self.generation.is_current(tag) {
            debug!("discarding superseded login result");
            return Ok(());
        }

        let user = Arc::new(user);
        self.state.apply(move |state| {
            let mut next = state.clone();
            next.session.phase = SessionPhase::Authenticated(user);
            next.session.loading = false;
            next.session.error = None;
            next
        });
        Ok(())
    }

    /// Record a failed attempt, unless superseded. The phase is left
    /// untouched: a failed re-login does not clear an existing session.
    fn fail(&self, tag: u64, err: espoir_api::Error) {
        if !self.generation.is_current(tag) {
            debug!("discarding superseded login failure");
            return;
        }
        let message = CoreError::from(err).to_string();
        self.state.apply(move |state| {
            let mut next = state.clone();
            next.session.loading = false;
            next.session.error = Some(message);
            next
        });
    }
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation {
            message: format!("{field} must not be empty"),
        });
    }
    Ok(())
}
