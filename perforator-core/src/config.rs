//! Configuration management for Perforator
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (PERFORATOR_*)
//! 3. Config file (~/.config/perforator/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::window::MAX_PER_PAGE;
use crate::{Error, Result};

/// GitHub API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base URL of the REST API (GitHub Enterprise installs differ)
    pub api_url: Option<String>,

    /// Connect and read timeout for API requests
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Page size cap used when planning windowed fetches
    pub max_per_page: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout: Duration::from_secs(30),
            max_per_page: MAX_PER_PAGE,
        }
    }
}

/// Default window and filters for metric commands
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Number of items to analyze
    pub limit: usize,

    /// Number of most recent items to skip
    pub skip: usize,

    /// Issue state filter (all, open, closed)
    pub state: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            skip: 0,
            state: "all".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API configuration
    pub github: GitHubConfig,

    /// Default command arguments
    pub defaults: DefaultsConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/perforator/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("perforator").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - PERFORATOR_API_URL: Base URL of the GitHub REST API
    /// - PERFORATOR_TIMEOUT: Request timeout (e.g. "10s")
    /// - PERFORATOR_LIMIT: Default number of items to analyze
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(api_url) = var("PERFORATOR_API_URL") {
            self.github.api_url = Some(api_url);
        }

        if let Some(timeout) = var("PERFORATOR_TIMEOUT") {
            self.github.timeout = humantime_serde::re::humantime::parse_duration(&timeout)
                .map_err(|e| Error::Config(format!("Invalid PERFORATOR_TIMEOUT: {}", e)))?;
        }

        if let Some(limit) = var("PERFORATOR_LIMIT") {
            self.defaults.limit = limit
                .parse()
                .map_err(|e| Error::Config(format!("Invalid PERFORATOR_LIMIT: {}", e)))?;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.github.api_url = Some(url);
        }

        self
    }

    /// Check values that would make every fetch fail
    pub fn validate(&self) -> Result<()> {
        if self.github.max_per_page == 0 || self.github.max_per_page > MAX_PER_PAGE {
            return Err(Error::Config(format!(
                "github.max_per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.github.max_per_page
            )));
        }

        if self.defaults.limit == 0 {
            return Err(Error::Config("defaults.limit must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(api_url: Option<String>) -> Result<Self> {
        let config = Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(api_url);
        config.validate()?;
        Ok(config)
    }
}
