//! TMDB poster provider
//!
//! Looks a title up through `/search/movie` and builds the image URL from the
//! first result's `poster_path`. Lookups are cached in Redis when a cache is
//! configured, including lookups that found no poster.
use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    services::providers::{PosterProvider, PLACEHOLDER_POSTER},
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

/// Template value shipped in example env files
const KEY_PLACEHOLDER: &str = "YOUR_TMDB_API_KEY";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    poster_path: Option<String>,
}

#[derive(Clone)]
pub struct TmdbPosterProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    image_base: String,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl TmdbPosterProvider {
    pub fn new(config: &Config, cache: Option<Cache>) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_millis(config.poster_timeout_ms))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
            image_base: config.tmdb_image_base.trim_end_matches('/').to_string(),
            cache,
            cache_ttl: config.poster_cache_ttl_secs,
        })
    }

    /// The configured key, unless it is blank or still the template value
    fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.contains(KEY_PLACEHOLDER))
    }

    fn poster_url(&self, poster_path: Option<&str>) -> String {
        match poster_path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) if path.starts_with('/') => format!("{}{}", self.image_base, path),
            Some(path) => format!("{}/{}", self.image_base, path),
            None => PLACEHOLDER_POSTER.to_string(),
        }
    }

    /// `poster_path` of the first search result, if any
    async fn fetch_poster_path(&self, api_key: &str, title: &str) -> AppResult<Option<String>> {
        cached!(
            self.cache.as_ref(),
            CacheKey::Poster(title.to_string()),
            self.cache_ttl,
            async move {
                let url = format!("{}/search/movie", self.api_url);

                let response = self
                    .http_client
                    .get(&url)
                    .query(&[
                        ("api_key", api_key),
                        ("query", title),
                        ("include_adult", "false"),
                        ("page", "1"),
                    ])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::ExternalApi(format!(
                        "TMDB API returned status {}: {}",
                        status, body
                    )));
                }

                let search: SearchResponse = response.json().await?;
                let poster_path = search.results.into_iter().next().and_then(|r| r.poster_path);

                tracing::debug!(
                    title = %title,
                    found = poster_path.is_some(),
                    provider = "tmdb",
                    "Poster search completed"
                );

                Ok::<_, AppError>(poster_path)
            }
        )
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbPosterProvider {
    async fn resolve(&self, title: &str) -> String {
        let Some(api_key) = self.usable_key() else {
            return PLACEHOLDER_POSTER.to_string();
        };

        match self.fetch_poster_path(api_key, title).await {
            Ok(poster_path) => self.poster_url(poster_path.as_deref()),
            Err(e) => {
                tracing::warn!(title = %title, error = %e, "Poster lookup failed");
                PLACEHOLDER_POSTER.to_string()
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
