//! Configuration for the Riot API client.

use crate::error::{LolError, LolResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the Riot API key.
pub const API_KEY_ENV: &str = "RIOT_API_KEY";

/// Static configuration, fixed at process start.
#[derive(Clone, Serialize, Deserialize)]
pub struct LolbyteConfig {
    /// Riot API key. Never read from the config file.
    #[serde(skip)]
    pub api_key: String,

    #[serde(default)]
    pub riot: RiotConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiotConfig {
    /// Platform shard used for league resources (`na1`, `euw1`, `kr`, ...).
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Regional routing value used for account and match resources.
    /// Derived from `platform` when unset.
    #[serde(default)]
    pub regional: Option<String>,

    /// Overrides `https://{platform}.api.riotgames.com`.
    #[serde(default)]
    pub platform_base_url: Option<String>,

    /// Overrides `https://{regional}.api.riotgames.com`.
    #[serde(default)]
    pub regional_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_min_spacing_ms")]
    pub min_spacing_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_platform() -> String {
    "na1".to_string()
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_min_spacing_ms() -> u64 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RiotConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            regional: None,
            platform_base_url: None,
            regional_base_url: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_spacing_ms: default_min_spacing_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LolbyteConfig {
    /// Create a configuration with defaults and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            riot: RiotConfig::default(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            http: HttpConfig::default(),
        }
    }

    /// Load the config file if it exists, otherwise use defaults.
    pub fn load(config_path: &Path, api_key: impl Into<String>) -> Result<Self> {
        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            tracing::info!(path = %config_path.display(), "Configuration file not found, using defaults");
            Self::new(String::new())
        };

        config.api_key = api_key.into();
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations that cannot make a single successful request.
    pub fn validate(&self) -> LolResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(LolError::Config(format!(
                "Riot API key is required (set {})",
                API_KEY_ENV
            )));
        }
        if self.riot.platform.trim().is_empty() {
            return Err(LolError::Config("riot.platform must not be empty".to_string()));
        }
        self.platform_base_url()?;
        self.regional_base_url()?;
        Ok(())
    }

    /// Regional routing value, explicit or derived from the platform.
    pub fn regional(&self) -> String {
        self.riot
            .regional
            .clone()
            .unwrap_or_else(|| regional_for_platform(&self.riot.platform).to_string())
    }

    /// Base URL for league resources.
    pub fn platform_base_url(&self) -> LolResult<Url> {
        match &self.riot.platform_base_url {
            Some(url) => Ok(Url::parse(url)?),
            None => Ok(Url::parse(&format!(
                "https://{}.api.riotgames.com",
                self.riot.platform.to_lowercase()
            ))?),
        }
    }

    /// Base URL for account and match resources.
    pub fn regional_base_url(&self) -> LolResult<Url> {
        match &self.riot.regional_base_url {
            Some(url) => Ok(Url::parse(url)?),
            None => Ok(Url::parse(&format!(
                "https://{}.api.riotgames.com",
                self.regional()
            ))?),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn min_spacing(&self) -> Duration {
        Duration::from_millis(self.rate_limit.min_spacing_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

impl fmt::Debug for LolbyteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LolbyteConfig")
            .field("api_key", &"<redacted>")
            .field("riot", &self.riot)
            .field("cache", &self.cache)
            .field("rate_limit", &self.rate_limit)
            .field("http", &self.http)
            .finish()
    }
}

/// Map a platform shard to the regional cluster that serves its account and
/// match data.
pub fn regional_for_platform(platform: &str) -> &'static str {
    match platform.to_lowercase().as_str() {
        "na1" | "br1" | "la1" | "la2" => "americas",
        "euw1" | "eun1" | "tr1" | "ru" | "me1" => "europe",
        "kr" | "jp1" => "asia",
        "oc1" | "ph2" | "sg2" | "th2" | "tw2" | "vn2" => "sea",
        _ => "americas",
    }
}
