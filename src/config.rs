use crate::api::api_sports_api::API_SPORTS_BASE_URL;
use crate::api::espn_api::ESPN_BASE_URL;
use crate::api::Provider;
use crate::utils::cache::DEFAULT_CACHE_CAPACITY;
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 8;
const DEFAULT_SCHEDULE_CACHE_TTL_SECS: u64 = 5 * 60;
const DEFAULT_SCORE_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_MOCK_SCHEDULE_PATH: &str = "mock/schedule_mock.json";

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub espn_base_url: String,
    pub api_sports_base_url: String,
    pub api_sports_key: Option<String>,
    pub schedule_provider: Provider,
    pub scores_provider: Provider,
    pub upstream_timeout: Duration,
    pub schedule_cache_ttl: Duration,
    pub score_cache_ttl: Duration,
    /// Entries kept in each cache before the least recently used is evicted
    pub cache_capacity: usize,
    pub mock_mode: bool,
    pub mock_schedule_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            espn_base_url: ESPN_BASE_URL.to_string(),
            api_sports_base_url: API_SPORTS_BASE_URL.to_string(),
            api_sports_key: None,
            schedule_provider: Provider::Espn,
            scores_provider: Provider::Espn,
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            schedule_cache_ttl: Duration::from_secs(DEFAULT_SCHEDULE_CACHE_TTL_SECS),
            score_cache_ttl: Duration::from_secs(DEFAULT_SCORE_CACHE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            mock_mode: false,
            mock_schedule_path: PathBuf::from(DEFAULT_MOCK_SCHEDULE_PATH),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = parse_value("PORT", &port)?;
        }
        if let Some(url) = get("ESPN_BASE_URL") {
            config.espn_base_url = url;
        }
        if let Some(url) = get("API_SPORTS_BASE_URL") {
            config.api_sports_base_url = url;
        }
        config.api_sports_key = get("FOOTBALL_API_KEY");
        if let Some(provider) = get("SCHEDULE_PROVIDER") {
            config.schedule_provider = parse_value("SCHEDULE_PROVIDER", &provider)?;
        }
        if let Some(provider) = get("SCORES_PROVIDER") {
            config.scores_provider = parse_value("SCORES_PROVIDER", &provider)?;
        }
        if let Some(secs) = get("UPSTREAM_TIMEOUT_SECS") {
            config.upstream_timeout = Duration::from_secs(parse_value("UPSTREAM_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = get("SCHEDULE_CACHE_TTL_SECS") {
            config.schedule_cache_ttl =
                Duration::from_secs(parse_value("SCHEDULE_CACHE_TTL_SECS", &secs)?);
        }
        if let Some(secs) = get("SCORE_CACHE_TTL_SECS") {
            config.score_cache_ttl = Duration::from_secs(parse_value("SCORE_CACHE_TTL_SECS", &secs)?);
        }
        if let Some(capacity) = get("CACHE_CAPACITY") {
            config.cache_capacity = parse_value("CACHE_CAPACITY", &capacity)?;
        }
        if let Some(flag) = get("MOCK_MODE") {
            config.mock_mode = parse_flag(&flag);
        }
        if let Some(path) = get("MOCK_SCHEDULE_PATH") {
            config.mock_schedule_path = PathBuf::from(path);
        }

        if config.uses_api_sports() && config.api_sports_key.is_none() {
            tracing::warn!("FOOTBALL_API_KEY not set; API-Sports requests will be rejected");
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn uses_api_sports(&self) -> bool {
        !self.mock_mode
            && (self.schedule_provider == Provider::ApiSports
                || self.scores_provider == Provider::ApiSports)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow!("Invalid value for {}: {:?} ({})", key, raw, e))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
