use crate::types::AlertFirePolicy;
use std::env;

/// CoinGecko's free tier serves at most a year of history.
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Longest forecast horizon served, matching the longest forecast period.
pub const MAX_FORECAST_DAYS: u32 = 365;

/// Alert scanner configuration.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Seconds between scan cycles.
    pub scan_interval_secs: u64,
    /// Minimum days of recent data fetched per coin each cycle.
    pub fetch_days: u32,
    /// Whether fired rules stay registered.
    pub fire_policy: AlertFirePolicy,
    /// Notifications kept per owner in the inbox.
    pub inbox_capacity: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 300,
            fetch_days: 1,
            fire_policy: AlertFirePolicy::KeepArmed,
            inbox_capacity: 50,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// CoinGecko API key (optional, for pro tier).
    pub coingecko_api_key: Option<String>,
    /// Fear & greed index endpoint.
    pub fear_greed_url: String,
    /// Days of history pulled for an analysis.
    pub history_days: u32,
    /// Forecast horizon used when a request does not specify one.
    pub default_forecast_days: u32,
    /// How long a computed analysis is reused (seconds).
    pub analysis_cache_ttl_secs: u64,
    /// Timeout for outbound HTTP requests (seconds).
    pub http_timeout_secs: u64,
    /// Alert scanner settings.
    pub alerts: AlertConfig,
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = AlertConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT").unwrap_or(3002),
            coingecko_api_key: env::var("COINGECKO_API_KEY").ok(),
            fear_greed_url: env::var("FEAR_GREED_URL")
                .unwrap_or_else(|_| "https://api.alternative.me/fng/".to_string()),
            history_days: parse_var::<u32>("HISTORY_DAYS")
                .unwrap_or(MAX_HISTORY_DAYS)
                .clamp(1, MAX_HISTORY_DAYS),
            default_forecast_days: parse_var::<u32>("DEFAULT_FORECAST_DAYS")
                .filter(|d| (1..=MAX_FORECAST_DAYS).contains(d))
                .unwrap_or(1),
            analysis_cache_ttl_secs: parse_var("ANALYSIS_CACHE_TTL_SECS").unwrap_or(60),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS").unwrap_or(10),
            alerts: AlertConfig {
                scan_interval_secs: parse_var::<u64>("ALERT_SCAN_INTERVAL_SECS")
                    .filter(|s| *s > 0)
                    .unwrap_or(defaults.scan_interval_secs),
                fetch_days: parse_var::<u32>("ALERT_FETCH_DAYS")
                    .unwrap_or(defaults.fetch_days)
                    .clamp(1, MAX_HISTORY_DAYS),
                fire_policy: env::var("ALERT_FIRE_POLICY")
                    .ok()
                    .and_then(|v| AlertFirePolicy::from_str(&v))
                    .unwrap_or(defaults.fire_policy),
                inbox_capacity: parse_var("ALERT_INBOX_CAPACITY")
                    .unwrap_or(defaults.inbox_capacity),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
