//! Fluent configuration builder

use super::models::*;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Configuration builder
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: DeskConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.base_url = url.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.api.token = Some(token.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.api.timeout_secs = secs;
        self
    }

    pub fn auto_refresh(mut self, enabled: bool) -> Self {
        self.config.refresh.auto_refresh = enabled;
        self
    }

    pub fn refresh_interval_secs(mut self, secs: u64) -> Self {
        self.config.refresh.interval_secs = secs;
        self
    }

    pub fn focus_debounce_ms(mut self, millis: u64) -> Self {
        self.config.refresh.focus_debounce_ms = millis;
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.storage.data_dir = dir.into();
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<DeskConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
