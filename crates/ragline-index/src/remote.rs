//! Remote embedding clients for OpenAI-compatible `/embeddings` endpoints.

use async_trait::async_trait;
use ndarray::Array1;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use ragline_core::{Error, RagConfig, Result};

use crate::embedder::EmbeddingBackend;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
const TOGETHER_EMBEDDINGS_URL: &str = "https://api.together.xyz/v1/embeddings";

/// Embedding model used on the primary (OpenAI) provider.
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Embedding model used on the secondary (Together) provider.
pub const DEFAULT_TOGETHER_EMBEDDING_MODEL: &str = "BAAI/bge-large-en-v1.5";

/// Inputs per embeddings request.
const EMBED_BATCH_SIZE: usize = 64;

/// Embedding client for one OpenAI-compatible endpoint.
#[derive(Debug)]
pub struct RemoteEmbedder {
    client: Client,
    url: &'static str,
    model: String,
    api_key: String,
}

impl RemoteEmbedder {
    pub fn new(url: &'static str, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    async fn embed_request(&self, inputs: &[String]) -> Result<Vec<Array1<f32>>> {
        let body = json!({
            "model": self.model,
            "input": inputs,
        });

        let response = self
            .client
            .post(self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("embeddings API error {status}: {body}")));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Http(format!("invalid embeddings response: {e}")))?;

        parse_embedding_vectors(&parsed, inputs.len())
    }
}

/// Extract embedding vectors from an OpenAI-compatible response body.
///
/// Any malformed entry is an inference error: the index build is
/// all-or-nothing, so a vector is never silently zero-filled.
fn parse_embedding_vectors(
    parsed: &serde_json::Value,
    expected: usize,
) -> Result<Vec<Array1<f32>>> {
    let data = parsed["data"]
        .as_array()
        .ok_or_else(|| Error::Inference("embeddings response missing data array".into()))?;

    let mut vectors = Vec::with_capacity(data.len());
    for item in data {
        let values = item["embedding"]
            .as_array()
            .ok_or_else(|| Error::Inference("embedding entry missing vector".into()))?;
        let mut vector = Vec::with_capacity(values.len());
        for v in values {
            let value = v.as_f64().ok_or_else(|| {
                Error::Inference(format!("non-numeric embedding element: {v}"))
            })?;
            vector.push(value as f32);
        }
        vectors.push(Array1::from_vec(vector));
    }

    if vectors.len() != expected {
        return Err(Error::Inference(format!(
            "embeddings response returned {} vectors for {} inputs",
            vectors.len(),
            expected
        )));
    }

    Ok(vectors)
}

#[async_trait]
impl EmbeddingBackend for RemoteEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Array1<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH_SIZE) {
            debug!("Embedding batch of {} with model {}", batch.len(), self.model);
            vectors.extend(self.embed_request(batch).await?);
        }
        Ok(vectors)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Resolve the embedding backend from the configuration snapshot.
///
/// Together is chosen whenever its API key is present (with the configured or
/// default open embedding model); otherwise the OpenAI default. A missing key
/// for the chosen provider is a configuration error.
pub fn resolve_embedding_backend(config: &RagConfig) -> Result<RemoteEmbedder> {
    if let Some(key) = &config.together_api_key {
        let model = config
            .together_embedding_model
            .clone()
            .unwrap_or_else(|| DEFAULT_TOGETHER_EMBEDDING_MODEL.to_string());
        return Ok(RemoteEmbedder::new(TOGETHER_EMBEDDINGS_URL, model, key));
    }

    let key = config
        .openai_api_key
        .as_ref()
        .ok_or_else(|| Error::Config("no embedding provider API key configured".into()))?;
    Ok(RemoteEmbedder::new(
        OPENAI_EMBEDDINGS_URL,
        DEFAULT_OPENAI_EMBEDDING_MODEL,
        key,
    ))
}
