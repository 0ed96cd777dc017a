//! Non-streaming chat completion client.
//!
//! Both providers speak the OpenAI chat completions format; only the endpoint
//! and key differ. Provider errors propagate to the caller unchanged — no
//! retry, no partial answer.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use ragline_core::{Error, Result};

use crate::types::{ChatMessage, ChatProvider};

/// Backend seam for answer generation, so pipelines can run against stubs.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Submit a conversation and return the completion text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Model identifier used for completions.
    fn model(&self) -> &str;
}

/// Chat completion client for a resolved provider/model pair.
#[derive(Debug)]
pub struct ChatClient {
    client: Client,
    provider: ChatProvider,
    model: String,
    api_key: String,
    temperature: f64,
}

impl ChatClient {
    pub fn new(
        provider: ChatProvider,
        model: impl Into<String>,
        api_key: impl Into<String>,
        temperature: f64,
    ) -> Self {
        Self {
            client: Client::new(),
            provider,
            model: model.into(),
            api_key: api_key.into(),
            temperature,
        }
    }

    pub fn provider(&self) -> ChatProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        debug!(
            "Chat completion via {} with model {}",
            self.provider, self.model
        );

        let response = self
            .client
            .post(self.provider.completions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("API error {status}: {body}")));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Http(format!("invalid response body: {e}")))?;

        parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Http("completion response missing message content".into()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_exposes_resolved_parts() {
        let client = ChatClient::new(ChatProvider::Together, "mistral-small", "tg-key", 0.0);
        assert_eq!(client.provider(), ChatProvider::Together);
        assert_eq!(ChatBackend::model(&client), "mistral-small");
        assert_eq!(client.temperature(), 0.0);
    }

    #[test]
    fn providers_use_distinct_endpoints() {
        assert_ne!(
            ChatProvider::OpenAI.completions_url(),
            ChatProvider::Together.completions_url()
        );
    }
}
