use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::{Context, eyre};
use serde::{Deserialize, Serialize};

use crate::setlistfm::client::{DEFAULT_MAX_PAGES, DEFAULT_SETLISTFM_BASE_URL};
use crate::spotify::client::DEFAULT_SPOTIFY_BASE_URL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub max_conns_per_host: usize,
    pub timeout_seconds: u64,
    /// Setlists with fewer songs than this are skipped.
    pub min_songs: usize,
    /// Caps concurrent song lookups per process when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_lookups: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setlistfm_api_key: Option<String>,
    pub setlistfm_max_pages: usize,
    pub spotify_base_url: String,
    pub setlistfm_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            max_conns_per_host: 10,
            timeout_seconds: 5,
            min_songs: 0,
            max_concurrent_lookups: None,
            setlistfm_api_key: None,
            setlistfm_max_pages: DEFAULT_MAX_PAGES,
            spotify_base_url: DEFAULT_SPOTIFY_BASE_URL.to_string(),
            setlistfm_base_url: DEFAULT_SETLISTFM_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("festwrap").join("config.toml"))
    }

    /// Loads the given file, or the default one if it exists, then applies
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::config_path() {
                Some(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| eyre!("No config directory found"))?;
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents =
            toml::to_string_pretty(&Self::default()).wrap_err("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }

    fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(port) = parse_var(&var, "FESTWRAP_PORT")? {
            self.port = port;
        }
        if let Some(max_conns) = parse_var(&var, "FESTWRAP_MAX_CONNS_PER_HOST")? {
            self.max_conns_per_host = max_conns;
        }
        if let Some(timeout) = parse_var(&var, "FESTWRAP_TIMEOUT_SECONDS")? {
            self.timeout_seconds = timeout;
        }
        if let Some(min_songs) = parse_var(&var, "FESTWRAP_MIN_SONGS")? {
            self.min_songs = min_songs;
        }
        if let Some(max_lookups) = parse_var(&var, "FESTWRAP_MAX_CONCURRENT_LOOKUPS")? {
            self.max_concurrent_lookups = Some(max_lookups);
        }
        if let Some(api_key) = var("SETLISTFM_API_KEY") {
            self.setlistfm_api_key = Some(api_key);
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn setlistfm_api_key(&self) -> Result<&str> {
        self.setlistfm_api_key
            .as_deref()
            .ok_or_else(|| eyre!("setlist.fm API key missing, set SETLISTFM_API_KEY"))
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(key)
        .map(|value| {
            value
                .parse::<T>()
                .wrap_err_with(|| format!("Could not read variable {key}={value}"))
        })
        .transpose()
}
