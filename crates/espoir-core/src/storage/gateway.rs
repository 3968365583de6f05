// ── Typed persistence gateway ──
//
// Owns the logical key namespace and the serde round-trip for each
// stored slice. Read failures degrade to "absent" -- a corrupt or
// unreadable value never blocks startup. Write failures are returned to
// the caller, which decides whether to surface or swallow them.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::{StorageBackend, StorageError};
use crate::model::{Movie, ThemeMode, User};

/// Logical storage keys.
///
/// The string forms are stable -- they name the on-disk documents and
/// must not change between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    UserSession,
    FavoritesSet,
    ThemeMode,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserSession => "user-session",
            Self::FavoritesSet => "favorites-set",
            Self::ThemeMode => "theme-mode",
        }
    }
}

/// Typed facade over a [`StorageBackend`].
///
/// Each store touches only its own key, so the gateway can be shared
/// freely without cross-store locking.
pub struct PersistenceGateway {
    backend: Arc<dyn StorageBackend>,
}

impl PersistenceGateway {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    // ── Session ──────────────────────────────────────────────────────

    pub async fn load_user(&self) -> Option<User> {
        self.load(StorageKey::UserSession).await
    }

    pub async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.store(StorageKey::UserSession, user).await
    }

    pub async fn clear_user(&self) -> Result<(), StorageError> {
        self.backend.remove(StorageKey::UserSession.as_str()).await
    }

    // ── Favorites ────────────────────────────────────────────────────

    pub async fn load_favorites(&self) -> Vec<Movie> {
        self.load(StorageKey::FavoritesSet).await.unwrap_or_default()
    }

    pub async fn save_favorites(&self, favorites: &[Movie]) -> Result<(), StorageError> {
        self.store(StorageKey::FavoritesSet, favorites).await
    }

    // ── Theme ────────────────────────────────────────────────────────

    pub async fn load_theme(&self) -> Option<ThemeMode> {
        self.load::<bool>(StorageKey::ThemeMode)
            .await
            .map(ThemeMode::from_dark_flag)
    }

    pub async fn save_theme(&self, mode: ThemeMode) -> Result<(), StorageError> {
        self.store(StorageKey::ThemeMode, &mode.is_dark()).await
    }

    // ── Raw helpers ──────────────────────────────────────────────────

    async fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = match self.backend.get(key.as_str()).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "storage read failed; treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "stored value corrupt; treating as absent");
                None
            }
        }
    }

    async fn store<T: Serialize + ?Sized>(
        &self,
        key: StorageKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key.as_str(), &raw).await
    }
}
