//! PokeAPI client
//!
//! Fetches catalog resources over HTTP, consulting the shared `ExpiringCache`
//! before every request and storing every successful response body in it.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::{LocationArea, Pokemon, ResourcePage};
use crate::cache::ExpiringCache;

/// Base URL for the public PokeAPI
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Number of location areas requested per page
const PAGE_SIZE: u32 = 20;

/// Errors that can occur when fetching catalog data
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The server has no resource at this URL
    #[error("resource not found for url {url}")]
    NotFound { url: String },

    /// The server answered with a non-success status other than 404
    #[error("unexpected status {status} for url {url}")]
    UnexpectedStatus { url: String, status: StatusCode },
}

/// Client for fetching catalog resources through the response cache
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: Client,
    base_url: String,
    cache: ExpiringCache,
}

impl PokeApiClient {
    /// Creates a client for `base_url` that caches responses in `cache`
    pub fn new(base_url: impl Into<String>, cache: ExpiringCache) -> Self {
        Self::with_client(Client::new(), base_url, cache)
    }

    /// Creates a client with a custom HTTP client
    pub fn with_client(http: Client, base_url: impl Into<String>, cache: ExpiringCache) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            cache,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the first page of location areas
    pub fn first_location_page_url(&self) -> String {
        format!("{}/location-area?offset=0&limit={}", self.base_url, PAGE_SIZE)
    }

    /// Fetches one page of location areas from a full page URL
    pub async fn fetch_location_areas(&self, url: &str) -> Result<ResourcePage, ApiError> {
        self.get_json(url).await
    }

    /// Fetches a single location area by name or id
    pub async fn fetch_location_area(&self, name: &str) -> Result<LocationArea, ApiError> {
        let url = format!("{}/location-area/{}", self.base_url, name);
        self.get_json(&url).await
    }

    /// Fetches a single creature by name or id
    pub async fn fetch_pokemon(&self, name: &str) -> Result<Pokemon, ApiError> {
        let url = format!("{}/pokemon/{}", self.base_url, name);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let body = self.get(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Returns the raw body for `url`, from the cache when present
    ///
    /// Only successful responses are cached.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        if let Some(body) = self.cache.lookup(url) {
            return Ok(body);
        }

        debug!(%url, "fetching");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        debug!(%url, %status, "response received");

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await?.to_vec();
        self.cache.insert(url, body.clone());
        Ok(body)
    }
}
