//! Configuration loading utilities
//!
//! YAML files provide the base, environment variables override individual fields.

use super::models::*;
use crate::utils::error::{DeskError, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_API_URL: &str = "COURSEDESK_API_URL";
pub const ENV_API_TOKEN: &str = "COURSEDESK_API_TOKEN";
pub const ENV_TIMEOUT: &str = "COURSEDESK_TIMEOUT";
pub const ENV_REFRESH_INTERVAL: &str = "COURSEDESK_REFRESH_INTERVAL";
pub const ENV_AUTO_REFRESH: &str = "COURSEDESK_AUTO_REFRESH";
pub const ENV_DATA_DIR: &str = "COURSEDESK_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "COURSEDESK_LOG_LEVEL";

impl DeskConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            DeskError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            DeskError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Defaults overlaid with environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay process environment variables onto this configuration
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Overlay values produced by `lookup`, keyed by the `COURSEDESK_*` names
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api.token = if token.is_empty() { None } else { Some(token) };
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.api.timeout_secs = timeout
                .parse()
                .map_err(|e| DeskError::Config(format!("Invalid timeout: {}", e)))?;
        }
        if let Some(interval) = lookup(ENV_REFRESH_INTERVAL) {
            self.refresh.interval_secs = interval
                .parse()
                .map_err(|e| DeskError::Config(format!("Invalid refresh interval: {}", e)))?;
        }
        if let Some(flag) = lookup(ENV_AUTO_REFRESH) {
            self.refresh.auto_refresh = parse_flag(&flag).ok_or_else(|| {
                DeskError::Config(format!("Invalid auto refresh flag: {}", flag))
            })?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        Ok(())
    }

    /// File (when given) plus environment, validated
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
