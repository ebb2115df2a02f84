//! reqwest implementation of [`BatchApi`]

use super::api::BatchApi;
use crate::config::ApiConfig;
use crate::core::types::{BatchFilter, BatchStatus, NewBatch, NewIndividualBatch};
use crate::utils::error::{DeskError, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{Value, json};
use tracing::{debug, error};
use url::Url;

/// HTTP client for the platform API
#[derive(Debug, Clone)]
pub struct HttpBatchApi {
    http_client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBatchApi {
    /// Create
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DeskError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DeskError::Config(format!("Invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DeskError::Config(format!(
                "API base URL cannot take a path: {}",
                base_url
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Base URL plus path segments, each percent-encoded on its own
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!("{} {}", method, url);
        let builder = self.http_client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder
            .send()
            .await
            .map_err(|e| DeskError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn read_json(response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = extract_message(&error_text)
                .or_else(|| {
                    let trimmed = error_text.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                })
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            error!("API error: {} - {}", status, message);
            return Err(DeskError::api(status.as_u16(), message));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DeskError::Network(e.to_string()))?;
        // 204 and empty 200 bodies both count as success.
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| DeskError::Parse(e.to_string()))
    }
}

/// Pull `message`/`error` out of a JSON error body
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
}

#[async_trait]
impl BatchApi for HttpBatchApi {
    async fn list_batches(&self, filter: &BatchFilter) -> Result<Value> {
        let builder = self.request(Method::GET, &["batches"]).query(&filter.to_query());
        self.send(builder).await
    }

    async fn get_batch(&self, id: &str) -> Result<Value> {
        self.send(self.request(Method::GET, &["batches", id]))
            .await
    }

    async fn create_group_batch(&self, batch: &NewBatch) -> Result<Value> {
        self.send(self.request(Method::POST, &["batches"]).json(batch))
            .await
    }

    async fn create_individual_batch(&self, request: &NewIndividualBatch) -> Result<Value> {
        self.send(self.request(Method::POST, &["batches", "individual"]).json(request))
            .await
    }

    async fn delete_batch(&self, id: &str) -> Result<Value> {
        self.send(self.request(Method::DELETE, &["batches", id]))
            .await
    }

    async fn update_batch_status(&self, id: &str, status: BatchStatus) -> Result<Value> {
        let body = json!({ "status": status });
        self.send(
            self.request(Method::PATCH, &["batches", id, "status"])
                .json(&body),
        )
        .await
    }

    async fn list_courses(&self) -> Result<Value> {
        self.send(self.request(Method::GET, &["courses"])).await
    }

    async fn list_instructors(&self) -> Result<Value> {
        self.send(self.request(Method::GET, &["instructors"])).await
    }

    async fn list_students(&self, page: Option<u32>) -> Result<Value> {
        let mut builder = self.request(Method::GET, &["students"]);
        if let Some(page) = page {
            builder = builder.query(&[("page", page.max(1))]);
        }
        self.send(builder).await
    }
}
