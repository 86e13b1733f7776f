//! OpenAI-compatible embedding client.
//!
//! The vector index treats embedding as part of its backend: a failure here
//! is a retrieval failure, reported as `Error::Retrieval`.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::{Error, Result};

pub struct EmbeddingClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    pub fn new(api_base: String, api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Retrieval(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base,
            api_key,
            model,
        })
    }

    /// Embed a single text.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Retrieval("embedding endpoint returned no vectors".into()))
    }

    /// Embed a batch of texts, preserving input order.
    pub async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let endpoint = format!("{}/embeddings", self.api_base.trim_end_matches('/'));
        let request = json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Retrieval(format!("embedding request to {} timed out", endpoint))
                } else if e.is_connect() {
                    Error::Retrieval(format!("failed to connect to {}: {}", endpoint, e))
                } else {
                    Error::Retrieval(format!("embedding request to {} failed: {}", endpoint, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(300).collect();
            return Err(Error::Retrieval(format!(
                "embedding endpoint returned HTTP {}: {}",
                status, preview
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Retrieval(format!("malformed embedding response: {}", e)))?;

        if parsed.data.len() != texts.len() {
            return Err(Error::Retrieval(format!(
                "embedding endpoint returned {} vectors for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }

        // The API reports an index per item; reorder defensively rather
        // than trusting response order.
        let mut items = parsed.data;
        items.sort_by_key(|item| item.index);
        Ok(items.into_iter().map(|item| item.embedding).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_items_reordered_by_index() {
        let raw = r#"{"data":[
            {"index":1,"embedding":[0.5,0.5]},
            {"index":0,"embedding":[0.1,0.2]}
        ]}"#;
        let mut parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        parsed.data.sort_by_key(|item| item.index);
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2]);
        assert_eq!(parsed.data[1].embedding, vec![0.5, 0.5]);
    }
}
