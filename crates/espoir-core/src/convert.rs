// ── Wire → domain conversion ──
//
// espoir-api's DTOs mirror the service JSON; these impls lift them into
// the domain model. An empty or malformed `release_date` (unreleased
// titles) becomes `None` rather than a parse error.

use chrono::NaiveDate;

use espoir_api::{GenreEntry, MovieDetails, MovieSummary, UserRecord};

use crate::model::{Genre, Movie, MovieId, User};

impl From<MovieSummary> for Movie {
    fn from(m: MovieSummary) -> Self {
        Self {
            id: MovieId(m.id),
            title: m.title,
            poster_path: m.poster_path,
            backdrop_path: m.backdrop_path,
            vote_average: m.vote_average,
            release_date: parse_release_date(&m.release_date),
            overview: m.overview,
            runtime: None,
            tagline: None,
            genres: Vec::new(),
        }
    }
}

impl From<MovieDetails> for Movie {
    fn from(m: MovieDetails) -> Self {
        Self {
            id: MovieId(m.id),
            title: m.title,
            poster_path: m.poster_path,
            backdrop_path: m.backdrop_path,
            vote_average: m.vote_average,
            release_date: parse_release_date(&m.release_date),
            overview: m.overview,
            runtime: m.runtime,
            tagline: m.tagline,
            genres: m.genres.into_iter().map(Genre::from).collect(),
        }
    }
}

impl From<GenreEntry> for Genre {
    fn from(g: GenreEntry) -> Self {
        Self {
            id: g.id,
            name: g.name,
        }
    }
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            session_token: r.token,
        }
    }
}

fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
