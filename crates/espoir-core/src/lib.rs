// espoir-core: Reactive state core between espoir-api and the presentation layer.

pub mod container;
pub mod convert;
pub mod error;
pub mod intent;
pub mod model;
pub mod state;
pub mod storage;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use container::AppStateContainer;
pub use error::CoreError;
pub use intent::Intent;
pub use state::{AppState, CatalogState, FavoritesState, SessionPhase, SessionState};
pub use storage::{
    FileBackend, MemoryBackend, PersistenceGateway, StorageBackend, StorageError, StorageKey,
};
pub use store::{CatalogStore, FavoritesStore, SessionStore, ThemeStore};
pub use stream::StateStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{Genre, Movie, MovieId, ThemeMode, User};
