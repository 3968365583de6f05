// ── Catalog store ──
//
// Owns trending/popular/search/detail data. Each category carries its
// own generation counter: issuing a new fetch supersedes the in-flight
// one for result-application purposes, and a superseded result --
// success or failure -- is discarded rather than applied over newer
// state. The underlying network call is not cancelled, only ignored.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use espoir_api::CatalogClient;

use super::{Generation, StateCell};
use crate::error::CoreError;
use crate::model::{Movie, MovieId};
use crate::state::CatalogState;

pub struct CatalogStore {
    state: Arc<StateCell>,
    catalog: Arc<CatalogClient>,
    trending_gen: Generation,
    popular_gen: Generation,
    search_gen: Generation,
    details_gen: Generation,
}

impl CatalogStore {
    pub(crate) fn new(state: Arc<StateCell>, catalog: Arc<CatalogClient>) -> Self {
        Self {
            state,
            catalog,
            trending_gen: Generation::new(),
            popular_gen: Generation::new(),
            search_gen: Generation::new(),
            details_gen: Generation::new(),
        }
    }

    /// Replace the trending list. A failed fetch leaves the previously
    /// loaded list intact and records the error.
    pub async fn fetch_trending(&self) {
        let tag = self.trending_gen.begin();
        self.set_loading(|c| c.trending_loading = true);

        match self.catalog.trending().await {
            Ok(results) => {
                if !self.trending_gen.is_current(tag) {
                    debug!("discarding superseded trending result");
                    return;
                }
                let movies: Vec<Movie> = results.into_iter().map(Movie::from).collect();
                self.state.apply(move |state| {
                    let mut next = state.clone();
                    next.catalog.trending = Arc::new(movies);
                    next.catalog.trending_loading = false;
                    next.catalog.last_refreshed = Some(Utc::now());
                    next
                });
            }
            Err(err) => {
                if !self.trending_gen.is_current(tag) {
                    debug!("discarding superseded trending failure");
                    return;
                }
                self.record_failure(err, |c| c.trending_loading = false);
            }
        }
    }

    /// Replace the popular list. Same contract as
    /// [`fetch_trending`](Self::fetch_trending).
    pub async fn fetch_popular(&self) {
        let tag = self.popular_gen.begin();
        self.set_loading(|c| c.popular_loading = true);

        match self.catalog.popular().await {
            Ok(results) => {
                if !self.popular_gen.is_current(tag) {
                    debug!("discarding superseded popular result");
                    return;
                }
                let movies: Vec<Movie> = results.into_iter().map(Movie::from).collect();
                self.state.apply(move |state| {
                    let mut next = state.clone();
                    next.catalog.popular = Arc::new(movies);
                    next.catalog.popular_loading = false;
                    next.catalog.last_refreshed = Some(Utc::now());
                    next
                });
            }
            Err(err) => {
                if !self.popular_gen.is_current(tag) {
                    debug!("discarding superseded popular failure");
                    return;
                }
                self.record_failure(err, |c| c.popular_loading = false);
            }
        }
    }

    /// Fetch the full record for one movie into `selected`.
    ///
    /// The prior selection is kept while the fetch is in flight.
    pub async fn fetch_details(&self, movie_id: MovieId) {
        let tag = self.details_gen.begin();
        self.set_loading(|c| c.details_loading = true);

        match self.catalog.details(movie_id.0).await {
            Ok(details) => {
                if !self.details_gen.is_current(tag) {
                    debug!("discarding superseded details result");
                    return;
                }
                let movie = Arc::new(Movie::from(details));
                self.state.apply(move |state| {
                    let mut next = state.clone();
                    next.catalog.selected = Some(movie);
                    next.catalog.details_loading = false;
                    next
                });
            }
            Err(err) => {
                if !self.details_gen.is_current(tag) {
                    debug!("discarding superseded details failure");
                    return;
                }
                if err.is_not_found() {
                    self.apply_failure_message(
                        format!("movie {movie_id} not found"),
                        |c| c.details_loading = false,
                    );
                } else {
                    self.record_failure(err, |c| c.details_loading = false);
                }
            }
        }
    }

    /// Search the catalog. Only the result of the most recently issued
    /// search is applied; a stale response is discarded.
    pub async fn search(&self, query: &str) -> Result<(), CoreError> {
        if query.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "search query must not be empty".into(),
            });
        }

        let tag = self.search_gen.begin();
        self.set_loading(|c| c.search_loading = true);

        match self.catalog.search(query).await {
            Ok(results) => {
                if !self.search_gen.is_current(tag) {
                    debug!(query, "discarding stale search result");
                    return Ok(());
                }
                let movies: Vec<Movie> = results.into_iter().map(Movie::from).collect();
                self.state.apply(move |state| {
                    let mut next = state.clone();
                    next.catalog.search_results = Arc::new(movies);
                    next.catalog.search_loading = false;
                    next
                });
            }
            Err(err) => {
                if !self.search_gen.is_current(tag) {
                    debug!(query, "discarding stale search failure");
                    return Ok(());
                }
                self.record_failure(err, |c| c.search_loading = false);
            }
        }
        Ok(())
    }

    /// Empty the search results without touching `search_loading`: an
    /// in-flight search keeps its flag, and its result is still governed
    /// by the generation tag.
    pub fn clear_search(&self) {
        self.state.apply(|state| {
            let mut next = state.clone();
            next.catalog.search_results = Arc::new(Vec::new());
            next
        });
    }

    // ── Internals ────────────────────────────────────────────────────

    fn set_loading<F>(&self, mark: F)
    where
        F: FnOnce(&mut CatalogState),
    {
        self.state.apply(move |state| {
            let mut next = state.clone();
            mark(&mut next.catalog);
            next
        });
    }

    fn record_failure<F>(&self, err: espoir_api::Error, clear_loading: F)
    where
        F: FnOnce(&mut CatalogState),
    {
        self.apply_failure_message(CoreError::from(err).to_string(), clear_loading);
    }

    fn apply_failure_message<F>(&self, message: String, clear_loading: F)
    where
        F: FnOnce(&mut CatalogState),
    {
        self.state.apply(move |state| {
            let mut next = state.clone();
            clear_loading(&mut next.catalog);
            next.catalog.error = Some(message);
            next
        });
    }
}
