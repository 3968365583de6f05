// ── Dispatchable intents ──
//
// The only mutation entry points the presentation layer sees. Each
// variant is routed by the container to the store owning that slice.

use secrecy::SecretString;

use crate::model::{Movie, MovieId, ThemeMode};

/// A named request to change state, carrying any required parameters.
#[derive(Debug)]
pub enum Intent {
    // ── Session ──────────────────────────────────────────────────────
    Login {
        email: String,
        password: SecretString,
    },
    Register {
        username: String,
        email: String,
        password: SecretString,
    },
    LoadPersistedSession,
    Logout,
    ClearError,

    // ── Favorites ────────────────────────────────────────────────────
    LoadPersistedFavorites,
    AddFavorite(Movie),
    RemoveFavorite(MovieId),

    // ── Catalog ──────────────────────────────────────────────────────
    FetchTrending,
    FetchPopular,
    FetchDetails(MovieId),
    Search(String),
    ClearSearch,

    // ── Theme ────────────────────────────────────────────────────────
    ToggleTheme,
    SetThemeFromPersisted(ThemeMode),
}
