//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream API endpoint and credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// Autocomplete behavior
    #[serde(default)]
    pub search: SearchConfig,

    /// Flight card rendering options
    #[serde(default)]
    pub display: DisplayConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override settings from an arbitrary variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FLIGHTS_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(key) = lookup("FLIGHTS_API_KEY") {
            self.api.api_key = Some(key);
        }
        if let Some(host) = lookup("FLIGHTS_API_HOST") {
            self.api.api_host = Some(host);
        }
        if let Some(secs) = lookup("FLIGHTS_SEARCH_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.api.search_timeout_secs = secs;
        }
        if let Some(secs) = lookup("FLIGHTS_AIRPORT_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.api.airport_timeout_secs = secs;
        }
    }

    /// Validate configuration values for basic sanity.
    ///
    /// Missing credentials are not an error here; calls short-circuit at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.airport_timeout_secs == 0 {
            return Err(AppError::validation("api.airport_timeout_secs must be > 0"));
        }
        if self.api.search_timeout_secs == 0 {
            return Err(AppError::validation("api.search_timeout_secs must be > 0"));
        }
        url::Url::parse(&self.api.base_url)?;
        Ok(())
    }
}

/// Upstream flight API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host of the flight API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Value for the `X-RapidAPI-Key` header
    #[serde(default)]
    pub api_key: Option<String>,

    /// Value for the `X-RapidAPI-Host` header
    #[serde(default)]
    pub api_host: Option<String>,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Deadline for airport lookups in seconds
    #[serde(default = "defaults::airport_timeout")]
    pub airport_timeout_secs: u64,

    /// Deadline for flight searches in seconds
    #[serde(default = "defaults::search_timeout")]
    pub search_timeout_secs: u64,
}

impl ApiConfig {
    /// True when base URL, key and host are all present.
    pub fn is_complete(&self) -> bool {
        let filled = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        !self.base_url.trim().is_empty() && filled(&self.api_key) && filled(&self.api_host)
    }

    pub fn airport_timeout(&self) -> Duration {
        Duration::from_secs(self.airport_timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            api_key: None,
            api_host: None,
            user_agent: defaults::user_agent(),
            airport_timeout_secs: defaults::airport_timeout(),
            search_timeout_secs: defaults::search_timeout(),
        }
    }
}

/// Airport autocomplete settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a lookup fires, in milliseconds
    #[serde(default = "defaults::debounce")]
    pub debounce_ms: u64,

    /// Shortest trimmed query worth sending upstream
    #[serde(default = "defaults::min_query_len")]
    pub min_query_len: usize,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: defaults::debounce(),
            min_query_len: defaults::min_query_len(),
        }
    }
}

/// Clock style for departure and arrival times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clock {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

/// Flight card rendering options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub clock: Clock,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://sky-scrapper.p.rapidapi.com".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; flight-search/0.1)".into()
    }
    pub fn airport_timeout() -> u64 {
        15
    }
    pub fn search_timeout() -> u64 {
        45
    }
    pub fn debounce() -> u64 {
        600
    }
    pub fn min_query_len() -> usize {
        1
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
