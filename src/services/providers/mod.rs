//! Poster image providers
//!
//! A provider maps a movie title to a displayable image URL. Lookups sit on
//! the request path, so providers absorb every failure (missing credentials,
//! network errors, empty results) and answer with [`PLACEHOLDER_POSTER`].
pub mod tmdb;

pub use tmdb::TmdbPosterProvider;

/// Image shown when no poster can be resolved
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/300x450?text=No+Image";

/// Trait for poster lookup services
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Poster URL for `title`, or [`PLACEHOLDER_POSTER`]. Never fails.
    async fn resolve(&self, title: &str) -> String;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Provider that always answers with the placeholder
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderProvider;

#[async_trait::async_trait]
impl PosterProvider for PlaceholderProvider {
    async fn resolve(&self, _title: &str) -> String {
        PLACEHOLDER_POSTER.to_string()
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_provider() {
        let provider = PlaceholderProvider;
        assert_eq!(provider.resolve("Avatar").await, PLACEHOLDER_POSTER);
        assert_eq!(provider.name(), "placeholder");
    }
}
