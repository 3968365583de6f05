// Catalog service HTTP client
//
// Wraps `reqwest::Client` with catalog-specific URL construction, API-key
// injection, and `{ "results": [...] }` envelope unwrapping. All methods
// return unwrapped payloads -- the envelope is stripped before the caller
// sees it.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{MovieDetails, MovieSummary, PagedResults};
use crate::transport::TransportConfig;

/// HTTP client for the catalog service.
///
/// The API key travels as an `api_key` query parameter on every request.
/// `image_url` resolves the relative poster/backdrop paths the service
/// returns against the configured image base URL.
#[derive(Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    image_base_url: Url,
    api_key: SecretString,
}

impl CatalogClient {
    /// Create a new catalog client from a `TransportConfig`.
    ///
    /// `base_url` is the API root (e.g. `https://api.themoviedb.org/3`);
    /// `image_base_url` is the image CDN root including the size segment
    /// (e.g. `https://image.tmdb.org/t/p/w500`).
    pub fn new(
        base_url: Url,
        image_base_url: Url,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            image_base_url,
            api_key,
        })
    }

    /// Create a catalog client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        image_base_url: Url,
        api_key: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            image_base_url,
            api_key,
        }
    }

    /// The catalog service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Trending movies for the week.
    ///
    /// `GET /trending/movie/week`
    pub async fn trending(&self) -> Result<Vec<MovieSummary>, Error> {
        let url = self.api_url("trending/movie/week")?;
        debug!("fetching trending movies");
        self.get_results(url).await
    }

    /// Currently popular movies.
    ///
    /// `GET /movie/popular`
    pub async fn popular(&self) -> Result<Vec<MovieSummary>, Error> {
        let url = self.api_url("movie/popular")?;
        debug!("fetching popular movies");
        self.get_results(url).await
    }

    /// Full record for a single movie.
    ///
    /// `GET /movie/{id}` -- an unknown id maps to [`Error::NotFound`].
    pub async fn details(&self, movie_id: u64) -> Result<MovieDetails, Error> {
        let url = self.api_url(&format!("movie/{movie_id}"))?;
        debug!(movie_id, "fetching movie details");
        self.get_json(url).await
    }

    /// Search the catalog by title.
    ///
    /// `GET /search/movie?query=...`
    pub async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, Error> {
        let mut url = self.api_url("search/movie")?;
        url.query_pairs_mut().append_pair("query", query);
        debug!(query, "searching catalog");
        self.get_results(url).await
    }

    /// Resolve a relative poster/backdrop path against the image base URL.
    ///
    /// Returns `None` when the record carries no path.
    pub fn image_url(&self, path: Option<&str>) -> Option<Url> {
        let path = path?;
        let base = self.image_base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).ok()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path, appending the `api_key` parameter.
    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}"))?;
        url.query_pairs_mut()
            .append_pair("api_key", self.api_key.expose_secret());
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the `{ "results": [...] }` envelope.
    async fn get_results<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        let body = self.get_body(url).await?;
        let page: PagedResults<T> = parse_json(&body)?;
        Ok(page.results)
    }

    /// Send a GET request and decode the body as a bare JSON document.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let body = self.get_body(url).await?;
        parse_json(&body)
    }

    async fn get_body(&self, url: Url) -> Result<String, Error> {
        // Log the path only -- the full URL carries the API key.
        let path = url.path().to_owned();
        debug!("GET {path}");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Api {
                message: "invalid or missing API key".into(),
                status: 401,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound { path });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: preview(&body).to_owned(),
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(Error::Transport)
    }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

/// First ~200 bytes of a body, cut at a character boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
