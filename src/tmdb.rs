use std::{num::NonZeroU32, sync::Arc, time::Duration};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use jiff::civil::Date;
use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::models::NewMovie;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("no API key is configured for the movie database")]
    Unauthenticated,

    #[error("the movie database is unavailable right now ({0})")]
    UpstreamUnavailable(String),

    #[error("the movie database sent a response we could not read ({0})")]
    MalformedResponse(String),

    #[error("movie {0} does not exist in the movie database")]
    NotFound(i64),
}

pub type MetadataResult<T> = Result<T, MetadataError>;

/// Shared outbound client; requests that outlive `timeout` fail as `UpstreamUnavailable`.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().user_agent("movie-shelf/0.1").timeout(timeout).build()
}

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        image_base_url: String,
        rps: u32,
    ) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("no TMDB_API_KEY provided; movie searches will fail");
        }

        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, api_key, base_url, image_base_url, limiter }
    }

    /// One page of candidates for `title`. No matches is an empty list.
    pub async fn search_by_title(&self, title: &str) -> MetadataResult<Vec<SearchCandidate>> {
        debug!(title = %title, "searching TMDB");

        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));
        let resp: SearchResponse = self
            .get_json(&url, &[("query", title)])
            .await?
            .ok_or_else(|| MetadataError::UpstreamUnavailable("search endpoint not found".into()))?;

        debug!(title = %title, results = resp.results.len(), "TMDB search complete");
        Ok(resp.results)
    }

    pub async fn fetch_details_by_id(&self, external_id: i64) -> MetadataResult<MovieDetails> {
        debug!(external_id = external_id, "fetching TMDB details");

        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), external_id);
        let resp: DetailsResponse = self
            .get_json(&url, &[("language", "en-US")])
            .await?
            .ok_or(MetadataError::NotFound(external_id))?;

        let title = resp.title.trim();
        if title.is_empty() {
            return Err(MetadataError::MalformedResponse("movie has no title".into()));
        }

        Ok(MovieDetails {
            title: title.to_string(),
            year: release_year(resp.release_date.as_deref()),
            description: resp.overview.filter(|s| !s.trim().is_empty()),
            img_url: poster_url(&self.image_base_url, resp.poster_path.as_deref()),
        })
    }

    /// `Ok(None)` on HTTP 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> MetadataResult<Option<T>> {
        if self.api_key.trim().is_empty() {
            return Err(MetadataError::Unauthenticated);
        }

        self.limiter.until_ready().await;

        let resp = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| MetadataError::UpstreamUnavailable(e.without_url().to_string()))?;

        match resp.status() {
            StatusCode::UNAUTHORIZED => return Err(MetadataError::Unauthenticated),
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                return Err(MetadataError::UpstreamUnavailable(format!("HTTP {status}")));
            },
            _ => {},
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| MetadataError::UpstreamUnavailable(e.without_url().to_string()))?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| MetadataError::MalformedResponse(e.to_string()))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchCandidate {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
}

impl SearchCandidate {
    pub fn year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MovieDetails {
    pub title: String,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub img_url: Option<String>,
}

impl From<MovieDetails> for NewMovie {
    fn from(details: MovieDetails) -> Self {
        NewMovie {
            title: details.title,
            year: details.year,
            description: details.description,
            img_url: details.img_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchCandidate>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    title: String,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
}

/// "2010-07-15" -> 2010. Blank or invalid dates have no year.
fn release_year(date: Option<&str>) -> Option<i32> {
    let date: Date = date?.trim().parse().ok()?;
    Some(i32::from(date.year()))
}

fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path?.trim().trim_start_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(format!("{}/{}", image_base_url.trim_end_matches('/'), path))
}
