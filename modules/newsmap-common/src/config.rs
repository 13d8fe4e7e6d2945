use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Headline providers
    pub newsdata_api_key: String,

    // Caching and session lifecycle
    pub cache_ttl_minutes: u64,
    pub session_ttl_minutes: u64,

    // Game
    pub round_count: usize,

    // Outbound I/O
    pub request_timeout_secs: u64,

    // Location dataset
    pub locations_file: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    /// Every variable has a default; `NEWSDATA_API_KEY` defaults to empty,
    /// which disables the primary provider and leaves only the RSS fallback.
    pub fn from_env() -> Self {
        Self {
            newsdata_api_key: env::var("NEWSDATA_API_KEY").unwrap_or_default(),
            cache_ttl_minutes: numeric_env("CACHE_TTL_MINUTES", 30),
            session_ttl_minutes: numeric_env("SESSION_TTL_MINUTES", 30),
            round_count: numeric_env("ROUND_COUNT", 5),
            request_timeout_secs: numeric_env("REQUEST_TIMEOUT_SECS", 5),
            locations_file: env::var("LOCATIONS_FILE")
                .unwrap_or_else(|_| "data/locations.json".to_string()),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: numeric_env("WEB_PORT", 8000),
        }
    }
}

fn numeric_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
