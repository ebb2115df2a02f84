//! Configuration models
//!
//! Every section deserializes with defaults so a partial YAML file is valid.

mod api;
mod logging;
mod refresh;
mod storage;

pub use api::ApiConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use refresh::RefreshConfig;
pub use storage::StorageConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskConfig {
    /// REST API connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Background refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Local persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}
