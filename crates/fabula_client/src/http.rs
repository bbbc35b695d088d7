//! HTTP client for the story REST API.

use crate::ClientConfig;
use async_trait::async_trait;
use fabula_core::{
    ContinueRequest, ContinueResponse, CreateStoryResponse, StoryId, StoryResponse,
};
use fabula_error::{FabulaResult, HttpError, JsonError};
use fabula_interface::StoryApi;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

/// Client for the story REST API.
#[derive(Debug, Clone)]
pub struct HttpStoryClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpStoryClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url, timeout = ?config.timeout))]
    pub fn new(config: ClientConfig) -> FabulaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!("Created story client");
        Ok(Self { config, client })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: impl reqwest::IntoUrl + std::fmt::Display,
        query: &[(&str, &str)],
    ) -> FabulaResult<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        decode(response).await
    }

    /// `{base_url}/story/{story_id}` with the id as one encoded path segment.
    fn story_url(&self, story_id: &StoryId) -> FabulaResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.config.endpoint("/story")).map_err(|e| {
            HttpError::new(format!("Invalid base URL {}: {}", self.config.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                HttpError::new(format!(
                    "Base URL cannot carry a path: {}",
                    self.config.base_url
                ))
            })?
            .push(story_id.as_str());
        Ok(url)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> FabulaResult<T> {
        let url = self.config.endpoint(path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        decode(response).await
    }
}

fn transport_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        tracing::error!("Request timed out: {}", e);
        HttpError::new(format!("Request timed out: {}", e))
    } else {
        tracing::error!("Request failed: {}", e);
        HttpError::new(format!("Request failed: {}", e))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> FabulaResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        tracing::error!(status = %status, "Server returned error");
        let detail = server_detail(&body).unwrap_or_else(|| status.to_string());
        return Err(HttpError::with_status(status.as_u16(), detail).into());
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!("Failed to parse response: {}", e);
        JsonError::new(format!("Failed to parse response: {}", e)).into()
    })
}

/// Pull a `detail` message out of an error body, as FastAPI-style servers send.
fn server_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(str::to_string)
}

#[async_trait]
impl StoryApi for HttpStoryClient {
    #[instrument(skip(self))]
    async fn create_story(&self) -> FabulaResult<CreateStoryResponse> {
        self.post_json("/story/create", &serde_json::json!({})).await
    }

    #[instrument(skip(self, request), fields(story_id = %request.story_id, rounds = request.rounds, mode = %request.mode))]
    async fn continue_story(&self, request: &ContinueRequest) -> FabulaResult<ContinueResponse> {
        self.post_json("/story/continue", request).await
    }

    #[instrument(skip(self), fields(story_id = %story_id))]
    async fn get_story(&self, story_id: &StoryId) -> FabulaResult<StoryResponse> {
        let url = self.story_url(story_id)?;
        self.get_json(url, &[]).await
    }

    #[instrument(skip(self))]
    async fn static_data(&self) -> FabulaResult<serde_json::Value> {
        self.get_json(self.config.endpoint("/story/static-data"), &[])
            .await
    }

    #[instrument(skip(self), fields(story_id = %story_id))]
    async fn compare(&self, story_id: &StoryId) -> FabulaResult<serde_json::Value> {
        self.get_json(
            self.config.endpoint("/metrics/compare"),
            &[("story_id", story_id.as_str())],
        )
        .await
    }
}
