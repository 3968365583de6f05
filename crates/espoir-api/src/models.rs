// Wire types for the catalog and auth services.
//
// These mirror the JSON the services actually send; conversion into the
// richer domain model lives in espoir-core. List endpoints return
// summaries -- `runtime`, `tagline`, and `genres` only appear on the
// detail endpoint.

use serde::Deserialize;

/// The `{ "results": [...] }` envelope wrapping every list endpoint.
///
/// The service also sends pagination counters alongside `results`;
/// they are ignored here (cursoring is out of scope for this client).
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct PagedResults<T> {
    #[serde(default)]
    pub results: Vec<T>,
}

/// A movie record as returned by the list endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    /// `YYYY-MM-DD`, or an empty string for unreleased titles.
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub overview: String,
}

/// A full movie record as returned by `GET /movie/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub overview: String,
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    #[serde(default)]
    pub genres: Vec<GenreEntry>,
}

/// A genre tag on a detail record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenreEntry {
    pub id: u64,
    pub name: String,
}

/// The account record returned by the auth service on login/register.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub token: String,
}
