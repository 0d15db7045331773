//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::{defaults, report_layout, timeouts};
use crate::core::error::{ArbflowError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the analytics API server
    pub api_base_url: Option<String>,

    /// Timeout in seconds for HTTP requests
    pub timeout: Option<u64>,

    /// Custom User-Agent header
    pub user_agent: Option<String>,

    /// Directory holding the persisted session and branding state
    pub data_dir: Option<String>,

    /// How long the manual-sync indicator stays visible, in milliseconds
    pub sync_indicator_ms: Option<u64>,

    /// Display width of the branding logo in generated reports, in millimetres
    pub logo_width_mm: Option<f64>,

    /// Enable verbose logging
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Some(defaults::API_BASE_URL.to_string()),
            timeout: Some(timeouts::DEFAULT_TIMEOUT_SECONDS),
            user_agent: None,
            data_dir: None, // Resolved against the platform data dir
            sync_indicator_ms: Some(timeouts::DEFAULT_SYNC_INDICATOR_MS),
            logo_width_mm: Some(report_layout::DEFAULT_LOGO_WIDTH),
            verbose: Some(false),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults for missing keys
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ArbflowError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| {
            ArbflowError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.fill_defaults();

        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        if let Ok(config) = Self::load_from_file(defaults::CONFIG_FILE_NAME) {
            return config;
        }

        // Parent directories, up to 3 levels
        for i in 1..=3 {
            let path = format!("{}{}", "../".repeat(i), defaults::CONFIG_FILE_NAME);
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        Self::default()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        if let Some(ref api_url) = cli_config.api_base_url {
            self.api_base_url = Some(api_url.clone());
        }
        if let Some(timeout) = cli_config.timeout {
            self.timeout = Some(timeout);
        }
        if let Some(ref data_dir) = cli_config.data_dir {
            self.data_dir = Some(data_dir.clone());
        }
        if cli_config.verbose {
            self.verbose = Some(true);
        }
    }

    fn fill_defaults(&mut self) {
        let defaults = Self::default();
        if self.api_base_url.is_none() {
            self.api_base_url = defaults.api_base_url;
        }
        if self.timeout.is_none() {
            self.timeout = defaults.timeout;
        }
        if self.sync_indicator_ms.is_none() {
            self.sync_indicator_ms = defaults.sync_indicator_ms;
        }
        if self.logo_width_mm.is_none() {
            self.logo_width_mm = defaults.logo_width_mm;
        }
        if self.verbose.is_none() {
            self.verbose = defaults.verbose;
        }
    }

    /// Base URL without a trailing slash
    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(defaults::API_BASE_URL)
            .trim_end_matches('/')
    }

    /// User agent sent with every request
    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .unwrap_or(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(timeouts::DEFAULT_TIMEOUT_SECONDS))
    }

    /// Get the sync indicator window as Duration
    pub fn sync_indicator_duration(&self) -> Duration {
        Duration::from_millis(
            self.sync_indicator_ms
                .unwrap_or(timeouts::DEFAULT_SYNC_INDICATOR_MS),
        )
    }

    /// Logo display width in millimetres
    pub fn logo_width(&self) -> f64 {
        self.logo_width_mm
            .unwrap_or(report_layout::DEFAULT_LOGO_WIDTH)
    }

    /// Resolve the data directory, falling back to the platform's local data dir
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(PathBuf::from(dir));
        }

        dirs::data_local_dir()
            .map(|base| base.join(defaults::DATA_DIR_NAME))
            .ok_or_else(|| {
                ArbflowError::Config(
                    "Could not determine a local data directory. Set data_dir explicitly."
                        .to_string(),
                )
            })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url) = self.api_base_url {
            let trimmed = url.trim();
            if trimmed.is_empty() {
                return Err(ArbflowError::Config(
                    "API base URL cannot be empty.".to_string(),
                ));
            }
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ArbflowError::Config(format!(
                    "API base URL '{url}' must start with http:// or https://."
                )));
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(ArbflowError::Config(
                    "Timeout cannot be 0. Expected a positive integer representing seconds."
                        .to_string(),
                ));
            }
            if timeout > timeouts::MAX_TIMEOUT_SECONDS {
                return Err(ArbflowError::Config(format!(
                    "Timeout of {timeout} seconds is too large. Expected at most {} seconds.",
                    timeouts::MAX_TIMEOUT_SECONDS
                )));
            }
        }

        if let Some(width) = self.logo_width_mm {
            let max_width = report_layout::PAGE_WIDTH - 2.0 * report_layout::LEFT_MARGIN;
            if !(width > 0.0 && width <= max_width) {
                return Err(ArbflowError::Config(format!(
                    "Logo width of {width}mm is invalid. Expected a value in (0, {max_width}]."
                )));
            }
        }

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    pub api_base_url: Option<String>,
    pub timeout: Option<u64>,
    pub data_dir: Option<String>,
    pub verbose: bool,
}
