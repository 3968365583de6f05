// ── Composite application state ──
//
// The immutable snapshot tree published to subscribers. A transition
// replaces the whole tree; consumers never hold a mutable handle into
// any part of it.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::model::{Movie, MovieId, ThemeMode, User};

/// Where the session state machine currently is.
///
/// `Unknown` holds only until the persisted session has been restored;
/// the presentation layer must not route between the authenticated and
/// unauthenticated roots before leaving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionPhase {
    #[default]
    Unknown,
    Unauthenticated,
    Authenticated(Arc<User>),
}

impl SessionPhase {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&Arc<User>> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Authentication slice, owned by `SessionStore`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// True while a login/register/restore/logout is in flight.
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    /// Starts loading: the session is unknown until the persisted record
    /// has been restored.
    fn default() -> Self {
        Self {
            phase: SessionPhase::Unknown,
            loading: true,
            error: None,
        }
    }
}

/// Favorited-movie slice, owned by `FavoritesStore`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesState {
    /// Insertion-ordered, unique by movie id.
    pub items: Arc<Vec<Movie>>,
    pub loading: bool,
}

impl FavoritesState {
    pub fn contains(&self, id: MovieId) -> bool {
        self.items.iter().any(|m| m.id == id)
    }
}

/// Catalog slice, owned by `CatalogStore`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub trending: Arc<Vec<Movie>>,
    pub popular: Arc<Vec<Movie>>,
    pub search_results: Arc<Vec<Movie>>,
    /// Kept while a newer detail fetch is in flight to avoid flicker
    /// through an absent state.
    pub selected: Option<Arc<Movie>>,
    pub trending_loading: bool,
    pub popular_loading: bool,
    pub search_loading: bool,
    pub details_loading: bool,
    pub error: Option<String>,
    /// When the last trending/popular fetch landed.
    pub last_refreshed: Option<DateTime<Utc>>,
}

/// The full state tree at one instant.
///
/// Published as `Arc<AppState>`; never partially updated -- every
/// transition produces a fully consistent new snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub session: SessionState,
    pub favorites: FavoritesState,
    pub catalog: CatalogState,
    pub theme: ThemeMode,
}
