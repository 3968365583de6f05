// ── Application state container ──
//
// Single subscribable owner of the composite `AppState` and the sole
// mutation entry point for the presentation layer. Composes the four
// stores over one shared `StateCell`; intents route to the store owning
// the slice they touch.

use std::sync::Arc;

use tracing::info;

use espoir_api::{AuthClient, CatalogClient};

use crate::error::CoreError;
use crate::intent::Intent;
use crate::state::AppState;
use crate::storage::PersistenceGateway;
use crate::store::{CatalogStore, FavoritesStore, SessionStore, StateCell, ThemeStore};
use crate::stream::StateStream;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`. State starts at the default snapshot;
/// call [`bootstrap()`](Self::bootstrap) to restore the persisted
/// slices. Dropping the last handle ends all subscriber streams.
#[derive(Clone)]
pub struct AppStateContainer {
    inner: Arc<Inner>,
}

struct Inner {
    state: Arc<StateCell>,
    session: SessionStore,
    favorites: FavoritesStore,
    catalog: CatalogStore,
    theme: ThemeStore,
}

impl AppStateContainer {
    /// Compose a container over the two remote clients and the gateway.
    pub fn new(
        auth: Arc<AuthClient>,
        catalog: Arc<CatalogClient>,
        gateway: Arc<PersistenceGateway>,
    ) -> Self {
        let state = Arc::new(StateCell::new(AppState::default()));

        Self {
            inner: Arc::new(Inner {
                session: SessionStore::new(Arc::clone(&state), auth, Arc::clone(&gateway)),
                favorites: FavoritesStore::new(Arc::clone(&state), Arc::clone(&gateway)),
                catalog: CatalogStore::new(Arc::clone(&state), catalog),
                theme: ThemeStore::new(Arc::clone(&state), gateway),
                state,
            }),
        }
    }

    /// Restore the persisted slices: theme, favorites, then session.
    ///
    /// Completes before returning, so the caller can route between the
    /// authenticated and unauthenticated roots on the session phase.
    pub async fn bootstrap(&self) {
        self.inner.theme.load_persisted().await;
        self.inner.favorites.load_persisted().await;
        self.inner.session.load_persisted().await;
        info!("state restored from persistence");
    }

    /// Route an intent to the store owning its slice and await completion.
    ///
    /// Auth and network failures are captured into the relevant `error`
    /// field and return `Ok`; `Err` is reserved for validation failures
    /// and persistence writes that must be surfaced.
    pub async fn dispatch(&self, intent: Intent) -> Result<(), CoreError> {
        match intent {
            // ── Session ──────────────────────────────────────────────
            Intent::Login { email, password } => {
                self.inner.session.login(&email, &password).await
            }
            Intent::Register {
                username,
                email,
                password,
            } => {
                self.inner
                    .session
                    .register(&username, &email, &password)
                    .await
            }
            Intent::LoadPersistedSession => {
                self.inner.session.load_persisted().await;
                Ok(())
            }
            Intent::Logout => {
                self.inner.session.logout().await;
                Ok(())
            }
            Intent::ClearError => {
                self.inner.session.clear_error();
                Ok(())
            }

            // ── Favorites ────────────────────────────────────────────
            Intent::LoadPersistedFavorites => {
                self.inner.favorites.load_persisted().await;
                Ok(())
            }
            Intent::AddFavorite(movie) => self.inner.favorites.add(movie).await,
            Intent::RemoveFavorite(movie_id) => self.inner.favorites.remove(movie_id).await,

            // ── Catalog ──────────────────────────────────────────────
            Intent::FetchTrending => {
                self.inner.catalog.fetch_trending().await;
                Ok(())
            }
            Intent::FetchPopular => {
                self.inner.catalog.fetch_popular().await;
                Ok(())
            }
            Intent::FetchDetails(movie_id) => {
                self.inner.catalog.fetch_details(movie_id).await;
                Ok(())
            }
            Intent::Search(query) => self.inner.catalog.search(&query).await,
            Intent::ClearSearch => {
                self.inner.catalog.clear_search();
                Ok(())
            }

            // ── Theme ────────────────────────────────────────────────
            Intent::ToggleTheme => {
                self.inner.theme.toggle().await;
                Ok(())
            }
            Intent::SetThemeFromPersisted(mode) => {
                self.inner.theme.set_from_persisted(mode);
                Ok(())
            }
        }
    }

    // ── State observation ────────────────────────────────────────────

    /// The current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<AppState> {
        self.inner.state.snapshot()
    }

    /// Subscribe to published snapshots. The subscription observes only
    /// snapshots published after registration.
    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.inner.state.subscribe())
    }

    /// Number of snapshots published so far.
    pub fn version(&self) -> u64 {
        self.inner.state.version()
    }

    // ── Store accessors ──────────────────────────────────────────────

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.inner.theme
    }
}
