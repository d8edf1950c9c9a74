use chrono::Duration;
use std::path::PathBuf;

pub const DEFAULT_CACHE_TTL_HOURS: i64 = 24;
pub const DEFAULT_CORS_PROXY_URL: &str = "https://corsproxy.io/?";

/// Opaque inputs handed to the engine by whoever hosts it.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fred_api_key: Option<String>,
    pub cache_ttl: Duration,
    pub proxy_url: Option<String>,
    pub data_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fred_api_key: None,
            cache_ttl: Duration::hours(DEFAULT_CACHE_TTL_HOURS),
            proxy_url: None,
            data_dir: PathBuf::from("."),
        }
    }
}

impl EngineConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fred_api_key = lookup("FRED_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let cache_ttl = lookup("CACHE_TTL_HOURS")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|h| *h > 0)
            .map(Duration::hours)
            .unwrap_or_else(|| Duration::hours(DEFAULT_CACHE_TTL_HOURS));

        let proxy_url = lookup("FRED_PROXY_URL")
            .filter(|u| !u.trim().is_empty())
            .or_else(|| {
                let enabled = lookup("USE_CORS_PROXY").map(|v| v == "true").unwrap_or(false);
                enabled.then(|| {
                    lookup("CORS_PROXY_URL").unwrap_or_else(|| DEFAULT_CORS_PROXY_URL.to_string())
                })
            });

        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self { fred_api_key, cache_ttl, proxy_url, data_dir }
    }
}
