//! Crate configuration.
//!
//! The two remote base addresses are fixed in production; tests point them
//! at a mock server instead. The cache directory defaults to the platform
//! cache location (e.g. `~/.cache/laddercache` on Linux).

use std::path::PathBuf;

use anyhow::Result;

/// Directory name used under the platform cache location
const APP_NAME: &str = "laddercache";

/// Base URL for fixtures, ladders and organisation endpoints
pub const API_BASE_URL: &str = "https://grassrootsapiproxy.cricket.com.au";

/// Base URL for the club search endpoint
pub const SEARCH_BASE_URL: &str = "https://api.playcommunity.pulselive.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub search_base_url: String,
    /// Overrides the platform cache directory when set.
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            search_base_url: SEARCH_BASE_URL.to_string(),
            cache_dir: None,
        }
    }
}

impl Config {
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
