use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{config::ClientSettings, error::RequestError};

/// A successful response. `data` is absent when the server sent no body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: u16, data: Option<Value>) -> Self {
        Self { status, data }
    }

    pub fn ok(data: Value) -> Self {
        Self::new(200, Some(data))
    }

    pub fn empty() -> Self {
        Self::new(200, None)
    }

    /// Decodes `data` into `T`; a missing payload yields `Ok(None)`.
    pub fn decode<T: DeserializeOwned>(self, what: &str) -> Result<Option<T>, RequestError> {
        let Some(data) = self.data else {
            return Ok(None);
        };
        serde_json::from_value(data)
            .map(Some)
            .map_err(|e| RequestError::decode(self.status, what, e))
    }
}

#[async_trait]
pub trait RestClient: Send + Sync {
    async fn get(&self, path: &str) -> Result<ApiResponse, RequestError>;
    async fn post(&self, path: &str, body: Value) -> Result<ApiResponse, RequestError>;
    async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, RequestError>;
    async fn delete(&self, path: &str) -> Result<ApiResponse, RequestError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestRestClient {
    http: Client,
    base_url: String,
}

impl ReqwestRestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let base_url = settings.base_url()?;
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("failed to build HTTP client")?;
        Ok(Self::with_client(http, base_url.as_str()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, RequestError> {
        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%method, path, status = status.as_u16(), "posts api response");

        if !status.is_success() {
            return Err(RequestError::from_status(
                status.as_u16(),
                status.canonical_reason(),
                &text,
            ));
        }

        let trimmed = text.trim();
        let data = if trimmed.is_empty() {
            None
        } else {
            // Non-JSON bodies are kept as strings; typed decoding rejects them later.
            Some(
                serde_json::from_str(trimmed)
                    .unwrap_or_else(|_| Value::String(trimmed.to_string())),
            )
        };
        Ok(ApiResponse::new(status.as_u16(), data))
    }
}

#[async_trait]
impl RestClient for ReqwestRestClient {
    async fn get(&self, path: &str) -> Result<ApiResponse, RequestError> {
        self.execute(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<ApiResponse, RequestError> {
        self.execute(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, RequestError> {
        self.execute(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, RequestError> {
        self.execute(Method::DELETE, path, None).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
