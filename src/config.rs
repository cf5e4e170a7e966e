use crate::error::{FinviewError, Result};
use chrono::{FixedOffset, Local, Offset};
use std::env;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3005;
const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_OFFSET_MINUTES: i32 = 24 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub price_api_url: String,
    pub request_timeout: Duration,
    /// Offset used to render fallback chart times.
    pub chart_offset: FixedOffset,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| FinviewError::Config(format!("{name} has an invalid value: {raw:?}"))),
        None => Ok(None),
    }
}

fn offset_from_minutes(minutes: i32) -> Result<FixedOffset> {
    if minutes.abs() >= MAX_OFFSET_MINUTES {
        return Err(FinviewError::Config(format!(
            "CHART_UTC_OFFSET_MINUTES must be within ±{MAX_OFFSET_MINUTES}, got {minutes}"
        )));
    }
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| FinviewError::Config(format!("invalid UTC offset: {minutes} minutes")))
}

impl Config {
    /// Reads configuration from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self> {
        let port = env_parse("PORT")?.unwrap_or(DEFAULT_PORT);

        let timeout_secs = env_parse("REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(FinviewError::Config("REQUEST_TIMEOUT_SECS must be positive".into()));
        }

        let chart_offset = match env_parse::<i32>("CHART_UTC_OFFSET_MINUTES")? {
            Some(minutes) => offset_from_minutes(minutes)?,
            None => Local::now().offset().fix(),
        };

        Ok(Self {
            port,
            backend_url: env_str("BACKEND_URL", DEFAULT_BACKEND_URL),
            price_api_url: env_str("PRICE_API_URL", DEFAULT_PRICE_API_URL),
            request_timeout: Duration::from_secs(timeout_secs),
            chart_offset,
        })
    }
}
