//! Configuration validation

use super::models::*;
use crate::utils::error::{DeskError, Result};
use tracing::debug;
use url::Url;

impl DeskConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.api.validate()?;
        self.refresh.validate()?;
        Ok(())
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            DeskError::Config(format!("api.base_url has invalid URL format: {}", e))
        })?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(DeskError::Config(format!(
                    "api.base_url must use http:// or https:// scheme, got: {}",
                    scheme
                )));
            }
        }

        if url.host_str().is_none() {
            return Err(DeskError::Config(
                "api.base_url must have a valid host".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(DeskError::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl RefreshConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(DeskError::Config(
                "refresh.interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
