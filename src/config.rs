use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Raw TMDB movies table
    #[serde(default = "default_movies_csv")]
    pub movies_csv: String,

    /// Raw TMDB credits table, joined to movies by title
    #[serde(default = "default_credits_csv")]
    pub credits_csv: String,

    /// Prebuilt corpus + similarity snapshot. Loaded when present, written after a fresh build.
    #[serde(default)]
    pub snapshot_path: Option<String>,

    /// Keep only the first N merged movies
    #[serde(default = "default_corpus_limit")]
    pub corpus_limit: usize,

    /// Vocabulary size cap
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// TMDB API key. Posters fall back to a placeholder without it.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix for TMDB poster paths
    #[serde(default = "default_tmdb_image_base")]
    pub tmdb_image_base: String,

    /// Upper bound for a single poster lookup
    #[serde(default = "default_poster_timeout_ms")]
    pub poster_timeout_ms: u64,

    /// TTL for cached poster lookups
    #[serde(default = "default_poster_cache_ttl_secs")]
    pub poster_cache_ttl_secs: u64,

    /// Redis connection URL. Poster caching is disabled when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations when the caller does not ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

fn default_movies_csv() -> String {
    "tmdb_5000_movies.csv".to_string()
}

fn default_credits_csv() -> String {
    "tmdb_5000_credits.csv".to_string()
}

fn default_corpus_limit() -> usize {
    1500
}

fn default_max_features() -> usize {
    5000
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base() -> String {
    "https://image.tmdb.org/t/p/w342".to_string()
}

fn default_poster_timeout_ms() -> u64 {
    5000
}

fn default_poster_cache_ttl_secs() -> u64 {
    86400 // 1 day
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_n() -> usize {
    6
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Build configuration from an explicit set of key/value pairs
    pub fn from_pairs<I>(pairs: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(pairs)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
