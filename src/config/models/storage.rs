//! Local storage configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where lesson notes, bookmarks and progress are kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Path of the key-value file backing lesson state
    pub fn lesson_store_path(&self) -> PathBuf {
        self.data_dir.join("lessons.json")
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".coursedesk")
}
