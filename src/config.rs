use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

use crate::remote::DEFAULT_API_BASE_URL;

pub const DEFAULT_STORE_PATH: &str = "memeboard-store.json";
pub const DEFAULT_CAPTION_DELAY_MS: u64 = 1000;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    // JSON file holding uploads, likes, saves and the profile
    pub store_path: PathBuf,
    // Fixed seed for the content simulation; random when absent
    pub seed: Option<u64>,
    pub caption_delay: Duration,
    pub search_debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            seed: None,
            caption_delay: Duration::from_millis(DEFAULT_CAPTION_DELAY_MS),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api_base_url = lookup("MEME_API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.api_base_url);

        let store_path = lookup("MEMEBOARD_STORE_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);

        let seed = lookup("MEMEBOARD_SEED")
            .map(|raw| parse_var::<u64>("MEMEBOARD_SEED", &raw))
            .transpose()?;

        let caption_delay = lookup("CAPTION_DELAY_MS")
            .map(|raw| parse_var::<u64>("CAPTION_DELAY_MS", &raw).map(Duration::from_millis))
            .transpose()?
            .unwrap_or(defaults.caption_delay);

        let search_debounce = lookup("SEARCH_DEBOUNCE_MS")
            .map(|raw| parse_var::<u64>("SEARCH_DEBOUNCE_MS", &raw).map(Duration::from_millis))
            .transpose()?
            .unwrap_or(defaults.search_debounce);

        Ok(Config {
            api_base_url,
            store_path,
            seed,
            caption_delay,
            search_debounce,
        })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidVar(key.to_string(), e.to_string()))
}
