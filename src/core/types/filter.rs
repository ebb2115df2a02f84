//! Query filters for the batch list

use super::batch::{Batch, BatchStatus, BatchType};
use serde::{Deserialize, Serialize};

/// Filter criteria sent with list requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFilter {
    pub course: Option<String>,
    pub status: Option<BatchStatus>,
    pub batch_type: Option<BatchType>,
    pub search: Option<String>,
    /// Page number (starts from 1)
    pub page: Option<u32>,
}

impl BatchFilter {
    /// Query string pairs, omitting unset criteria
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(course) = &self.course {
            query.push(("course", course.clone()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.to_string()));
        }
        if let Some(batch_type) = self.batch_type {
            query.push(("batch_type", batch_type.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.max(1).to_string()));
        }
        query
    }

    /// Local match, used when filtering fallback data
    pub fn matches(&self, batch: &Batch) -> bool {
        if let Some(course) = &self.course {
            if batch.course_id.as_deref() != Some(course.as_str()) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != batch.status) {
            return false;
        }
        if self.batch_type.is_some_and(|t| t != batch.batch_type) {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !batch.name.to_lowercase().contains(&needle)
                && !batch.code.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}
