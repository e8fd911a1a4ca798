//! HTTP client helpers for tests.

use docent::DocumentSummary;
use docent::gateway::payload::{ChatRequest, ChatResponse};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    fn status_header(resp: &reqwest::Response) -> String {
        resp.headers()
            .get("x-docent-status")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string()
    }

    async fn error_for(resp: reqwest::Response) -> TestClientError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        match status {
            400 | 422 => TestClientError::BadRequest(status, body),
            409 => TestClientError::Conflict(body),
            404 => TestClientError::NotFound(body),
            _ => TestClientError::UnexpectedStatus(status, body),
        }
    }

    pub async fn upload(
        &self,
        file_name: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> Result<(DocumentSummary, String), TestClientError> {
        let part = Part::bytes(bytes.into()).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let resp = self
            .client
            .post(self.url("/api/documents/upload"))
            .multipart(form)
            .send()
            .await?;
        let status_header = Self::status_header(&resp);

        if resp.status().is_success() {
            Ok((resp.json().await?, status_header))
        } else {
            Err(Self::error_for(resp).await)
        }
    }

    pub async fn documents(&self) -> Result<Vec<DocumentSummary>, TestClientError> {
        let resp = self.client.get(self.url("/api/documents")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(Self::error_for(resp).await)
        }
    }

    pub async fn delete(&self, id: u64) -> Result<DocumentSummary, TestClientError> {
        let resp = self
            .client
            .delete(self.url(&format!("/api/documents/{id}")))
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(Self::error_for(resp).await)
        }
    }

    pub async fn chat(&self, message: &str) -> Result<(ChatResponse, String), TestClientError> {
        let request = ChatRequest {
            message: message.to_string(),
        };
        let resp = self
            .client
            .post(self.url("/api/chat/message"))
            .json(&request)
            .send()
            .await?;
        let status_header = Self::status_header(&resp);

        if resp.status().is_success() {
            Ok((resp.json().await?, status_header))
        } else {
            Err(Self::error_for(resp).await)
        }
    }

    /// Posts `body` verbatim as JSON and returns the status code.
    pub async fn chat_raw(&self, body: &'static str) -> Result<u16, TestClientError> {
        let resp = self
            .client
            .post(self.url("/api/chat/message"))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        Ok(resp.status().as_u16())
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(Self::error_for(resp).await)
        }
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(Self::error_for(resp).await)
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComponentStatus {
    pub http: String,
    pub storage: String,
    pub documents: usize,
    pub synthesis: String,
    pub generator: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ComponentStatus,
}

impl ReadyResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad request ({0}): {1}")]
    BadRequest(u16, String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
