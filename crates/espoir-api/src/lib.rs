//! Async Rust client for the Espoir catalog and auth services.
//!
//! Two API surfaces: the catalog service (a TMDB-compatible REST API
//! serving trending/popular/search/detail movie records) and the auth
//! service (token-based login and registration). `espoir-core` sits on
//! top of this crate and maps its errors into user-facing diagnostics.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::AuthClient;
pub use catalog::CatalogClient;
pub use error::Error;
pub use models::{GenreEntry, MovieDetails, MovieSummary, PagedResults, UserRecord};
pub use transport::TransportConfig;
