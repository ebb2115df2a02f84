//! Configuration for the admin client
//!
//! Sources, lowest precedence first: built-in defaults, a YAML file, `COURSEDESK_*`
//! environment variables.

mod builder;
mod loader;
pub mod models;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::{
    ENV_API_TOKEN, ENV_API_URL, ENV_AUTO_REFRESH, ENV_DATA_DIR, ENV_LOG_LEVEL,
    ENV_REFRESH_INTERVAL, ENV_TIMEOUT,
};
pub use models::*;
