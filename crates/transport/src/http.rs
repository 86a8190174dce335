use crate::service::ChatService;
use crate::types::{ChatRequest, ChatResponse, HistoryRecord, HistoryRequest, HistoryResponse};

use murmur_core::{Error, Result, ServerConfig};
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// JSON-over-HTTP client for the chat service
pub struct HttpChatService {
    client: HttpClient,
    base_url: String,
}

impl HttpChatService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string() })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "posting to chat service");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!("{} returned {}: {}", url, status, body)));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| Error::Transport(format!("invalid response from {}: {}", url, e)))
    }
}

#[async_trait::async_trait]
impl ChatService for HttpChatService {
    async fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>> {
        let response: HistoryResponse = self.post_json("get_history", &HistoryRequest::new(user_id)).await?;
        Ok(response.into_records())
    }

    async fn send_chat(&self, user_input: &str) -> Result<Option<String>> {
        let response: ChatResponse = self.post_json("chat", &ChatRequest::new(user_input)).await?;
        Ok(response.into_reply())
    }
}
