//! Refresh scheduler configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Background refresh settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Start with the polling timer enabled
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,
    /// Polling period in seconds
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Window in which focus/visibility events collapse into one refresh
    #[serde(default = "default_focus_debounce")]
    pub focus_debounce_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh: default_auto_refresh(),
            interval_secs: default_interval(),
            focus_debounce_ms: default_focus_debounce(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn focus_debounce(&self) -> Duration {
        Duration::from_millis(self.focus_debounce_ms)
    }
}

fn default_auto_refresh() -> bool {
    true
}

fn default_interval() -> u64 {
    30
}

fn default_focus_debounce() -> u64 {
    500
}
