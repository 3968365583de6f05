// ── Favorites store ──
//
// Owns the favorited-movie set: insertion-ordered, unique by movie id.
// Mutations land in memory atomically first, then the full updated set
// is written through the gateway; a failed write rolls the in-memory
// change back so memory and storage stay equivalent.

use std::sync::Arc;

use super::StateCell;
use crate::error::CoreError;
use crate::model::{Movie, MovieId};
use crate::storage::PersistenceGateway;

pub struct FavoritesStore {
    state: Arc<StateCell>,
    gateway: Arc<PersistenceGateway>,
}

impl FavoritesStore {
    pub(crate) fn new(state: Arc<StateCell>, gateway: Arc<PersistenceGateway>) -> Self {
        Self { state, gateway }
    }

    /// Replace the in-memory set wholesale with the persisted one.
    ///
    /// Idempotent: absent concurrent mutation, a second call yields the
    /// same set. A read failure degrades to an empty set.
    pub async fn load_persisted(&self) {
        self.state.apply(|state| {
            let mut next = state.clone();
            next.favorites.loading = true;
            next
        });

        let items = self.gateway.load_favorites().await;

        self.state.apply(move |state| {
            let mut next = state.clone();
            next.favorites.items = Arc::new(items);
            next.favorites.loading = false;
            next
        });
    }

    /// Append a movie to the set and persist the updated set.
    ///
    /// No-op -- no mutation, no write -- when a favorite with the same id
    /// already exists.
    pub async fn add(&self, movie: Movie) -> Result<(), CoreError> {
        let movie_id = movie.id;

        // Memory first, atomically; the set for the follow-up write is
        // captured inside the same transition.
        let updated = self.state.apply_with(move |state| {
            if state.favorites.contains(movie_id) {
                return (state.clone(), None);
            }
            let mut items = state.favorites.items.as_ref().clone();
            items.push(movie);
            let items = Arc::new(items);
            let mut next = state.clone();
            next.favorites.items = Arc::clone(&items);
            (next, Some(items))
        });

        let Some(items) = updated else {
            return Ok(());
        };

        if let Err(err) = self.gateway.save_favorites(&items).await {
            // Roll back so memory never diverges from storage.
            self.state.apply(move |state| {
                let mut next = state.clone();
                let mut rolled = next.favorites.items.as_ref().clone();
                rolled.retain(|m| m.id != movie_id);
                next.favorites.items = Arc::new(rolled);
                next
            });
            return Err(err.into());
        }
        Ok(())
    }

    /// Remove the matching entry, if present, and persist the updated set.
    ///
    /// No-op -- no mutation, no write -- when the id is absent.
    pub async fn remove(&self, movie_id: MovieId) -> Result<(), CoreError> {
        let removed = self.state.apply_with(move |state| {
            let Some(index) = state.favorites.items.iter().position(|m| m.id == movie_id)
            else {
                return (state.clone(), None);
            };
            let mut items = state.favorites.items.as_ref().clone();
            let movie = items.remove(index);
            let items = Arc::new(items);
            let mut next = state.clone();
            next.favorites.items = Arc::clone(&items);
            (next, Some((movie, index, items)))
        });

        let Some((movie, index, items)) = removed else {
            return Ok(());
        };

        if let Err(err) = self.gateway.save_favorites(&items).await {
            // Reinsert at the original position to keep display order.
            self.state.apply(move |state| {
                let mut next = state.clone();
                let mut rolled = next.favorites.items.as_ref().clone();
                let at = index.min(rolled.len());
                rolled.insert(at, movie);
                next.favorites.items = Arc::new(rolled);
                next
            });
            return Err(err.into());
        }
        Ok(())
    }
}
