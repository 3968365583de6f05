// ── Movie domain types ──

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalog-wide stable identifier for a movie.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A genre tag attached to a movie's detail record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// An immutable catalog record, identified by `id`.
///
/// List endpoints populate only the summary fields; `runtime`, `tagline`,
/// and `genres` arrive empty and are filled once a detail fetch lands.
/// The serde defaults keep favorite sets persisted from summaries loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub release_date: Option<NaiveDate>,
    pub overview: String,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}
