use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use itertools::Itertools;

use crate::error::{Result, RosterError};
use crate::fetch::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://www.eliteprospects.com/team/18066/arizona-state-univ.";
pub const DEFAULT_SITE_ORIGIN: &str = "https://www.eliteprospects.com";
pub const DEFAULT_CURRENT_SEASON: &str = "2025-2026";
pub const DEFAULT_FUTURE_SEASONS: [&str; 3] = ["2026-2027", "2027-2028", "2028-2029"];
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.93 Safari/537.36";
pub const DEFAULT_OUTPUT_PATH: &str = "asu_hockey_data.json";

/// Settings for a scrape run, built once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    pub current_season: String,
    pub future_seasons: Vec<String>,
    pub base_url: String,
    /// Origin prefixed to site-relative player links.
    pub site_origin: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_initial_delay: Duration,
    pub retry_max_delay: Duration,
    pub request_delay: Duration,
    pub output_path: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            current_season: DEFAULT_CURRENT_SEASON.to_string(),
            future_seasons: DEFAULT_FUTURE_SEASONS.map(String::from).to_vec(),
            base_url: DEFAULT_BASE_URL.to_string(),
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(15),
            max_retries: 3,
            retry_initial_delay: Duration::from_millis(1000),
            retry_max_delay: Duration::from_millis(10_000),
            request_delay: Duration::from_millis(1000),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl ScraperConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup, falling back to the
    /// defaults for keys that are missing or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let future_seasons = match get("FUTURE_SEASONS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect_vec(),
            None => defaults.future_seasons,
        };

        Ok(Self {
            current_season: get("CURRENT_SEASON").unwrap_or(defaults.current_season),
            future_seasons,
            base_url: get("BASE_URL").unwrap_or(defaults.base_url),
            site_origin: get("SITE_ORIGIN").unwrap_or(defaults.site_origin),
            user_agent: get("USER_AGENT").unwrap_or(defaults.user_agent),
            request_timeout: parse_number::<u64>(get("REQUEST_TIMEOUT"), "REQUEST_TIMEOUT")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_retries: parse_number::<u32>(get("MAX_RETRIES"), "MAX_RETRIES")?
                .unwrap_or(defaults.max_retries),
            retry_initial_delay: parse_millis(
                get("RETRY_INITIAL_DELAY_MS"),
                "RETRY_INITIAL_DELAY_MS",
            )?
            .unwrap_or(defaults.retry_initial_delay),
            retry_max_delay: parse_millis(get("RETRY_MAX_DELAY_MS"), "RETRY_MAX_DELAY_MS")?
                .unwrap_or(defaults.retry_max_delay),
            request_delay: parse_millis(get("REQUEST_DELAY_MS"), "REQUEST_DELAY_MS")?
                .unwrap_or(defaults.request_delay),
            output_path: get("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: self.retry_initial_delay,
            max_delay: self.retry_max_delay,
        }
    }
}

fn parse_number<T>(value: Option<String>, key: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse::<T>().map_err(|e| RosterError::Config {
                key,
                value: v.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn parse_millis(value: Option<String>, key: &'static str) -> Result<Option<Duration>> {
    Ok(parse_number::<u64>(value, key)?.map(Duration::from_millis))
}
