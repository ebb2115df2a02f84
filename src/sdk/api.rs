//! REST endpoint abstraction
//!
//! Endpoints return raw JSON; callers pass list bodies through the reconciler
//! because the envelope differs between endpoints and server versions.

use crate::core::types::{BatchFilter, BatchStatus, NewBatch, NewIndividualBatch};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The platform endpoints the admin client consumes
#[async_trait]
pub trait BatchApi: Send + Sync {
    /// `GET /batches` with filter query
    async fn list_batches(&self, filter: &BatchFilter) -> Result<Value>;

    /// `GET /batches/{id}`
    async fn get_batch(&self, id: &str) -> Result<Value>;

    /// `POST /batches`
    async fn create_group_batch(&self, batch: &NewBatch) -> Result<Value>;

    /// `POST /batches/individual`
    async fn create_individual_batch(&self, request: &NewIndividualBatch) -> Result<Value>;

    /// `DELETE /batches/{id}`
    async fn delete_batch(&self, id: &str) -> Result<Value>;

    /// `PATCH /batches/{id}/status`
    async fn update_batch_status(&self, id: &str, status: BatchStatus) -> Result<Value>;

    /// `GET /courses`
    async fn list_courses(&self) -> Result<Value>;

    /// `GET /instructors`
    async fn list_instructors(&self) -> Result<Value>;

    /// `GET /students`, optionally one page
    async fn list_students(&self, page: Option<u32>) -> Result<Value>;
}
