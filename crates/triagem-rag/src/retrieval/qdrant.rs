//! Qdrant-backed vector index, over the REST API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{IndexDocument, VectorSearch};
use crate::config::QdrantConfig;
use crate::embeddings::EmbeddingClient;
use crate::error::{Error, Result};
use crate::types::RetrievedPassage;

pub struct QdrantIndex {
    client: Client,
    base_url: String,
    collection: String,
    vector_dim: usize,
    embedder: EmbeddingClient,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    payload: Option<PointPayload>,
}

#[derive(Debug, Deserialize)]
struct PointPayload {
    #[serde(default)]
    text: String,
}

impl QdrantIndex {
    pub fn new(config: &QdrantConfig, embedder: EmbeddingClient, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Retrieval(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            vector_dim: config.vector_dim,
            embedder,
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    fn request_error(endpoint: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Retrieval(format!("request to {} timed out", endpoint))
        } else if e.is_connect() {
            Error::Retrieval(format!("vector backend unreachable at {}: {}", endpoint, e))
        } else {
            Error::Retrieval(format!("request to {} failed: {}", endpoint, e))
        }
    }

    async fn check_status(response: reqwest::Response, endpoint: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let preview: String = body.chars().take(300).collect();
        Err(Error::Retrieval(format!(
            "{} returned HTTP {}: {}",
            endpoint, status, preview
        )))
    }
}

#[async_trait]
impl VectorSearch for QdrantIndex {
    async fn collection_exists(&self) -> Result<bool> {
        let endpoint = self.collection_url();
        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| Self::request_error(&endpoint, e))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                let preview: String = body.chars().take(300).collect();
                Err(Error::Retrieval(format!(
                    "collection check returned HTTP {}: {}",
                    status, preview
                )))
            }
        }
    }

    async fn create_collection(&self) -> Result<()> {
        let endpoint = self.collection_url();
        let request = json!({
            "vectors": { "size": self.vector_dim, "distance": "Cosine" }
        });

        let response = self
            .client
            .put(&endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::request_error(&endpoint, e))?;
        Self::check_status(response, &endpoint).await?;

        tracing::info!(collection = %self.collection, dim = self.vector_dim, "created collection");
        Ok(())
    }

    async fn upsert(&self, documents: &[IndexDocument]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        let indexed_at = chrono::Utc::now().timestamp();
        let points: Vec<serde_json::Value> = documents
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| {
                json!({
                    "id": doc.id.to_string(),
                    "vector": vector,
                    "payload": {
                        "patient_id": doc.patient_id,
                        "text": doc.text,
                        "indexed_at": indexed_at,
                    }
                })
            })
            .collect();

        let endpoint = format!("{}/points?wait=true", self.collection_url());
        let response = self
            .client
            .put(&endpoint)
            .json(&json!({ "points": points }))
            .send()
            .await
            .map_err(|e| Self::request_error(&endpoint, e))?;
        Self::check_status(response, &endpoint).await?;

        tracing::info!(points = documents.len(), collection = %self.collection, "upserted points");
        Ok(())
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>> {
        let vector = self.embedder.embed(query).await?;

        let endpoint = format!("{}/points/search", self.collection_url());
        let request = json!({
            "vector": vector,
            "limit": k,
            "with_payload": true,
        });

        let response = self
            .client
            .post(&endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::request_error(&endpoint, e))?;
        let response = Self::check_status(response, &endpoint).await?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Retrieval(format!("malformed search response: {}", e)))?;

        let passages = parsed
            .result
            .into_iter()
            .enumerate()
            .filter_map(|(rank, point)| {
                let payload = point.payload?;
                if payload.text.is_empty() {
                    return None;
                }
                Some(RetrievedPassage {
                    text: payload.text,
                    rank,
                })
            })
            .collect::<Vec<_>>();

        tracing::debug!(hits = passages.len(), k, "semantic search completed");
        Ok(passages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parsing() {
        let raw = r#"{"result":[
            {"id":"a","score":0.92,"payload":{"patient_id":"42","text":"Eletro alterado"}},
            {"id":"b","score":0.81,"payload":{"patient_id":"007","text":"Hemograma normal"}}
        ]}"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.result.len(), 2);
        assert_eq!(parsed.result[0].payload.as_ref().unwrap().text, "Eletro alterado");
    }

    #[test]
    fn test_search_response_without_results() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"result":[]}"#).unwrap();
        assert!(parsed.result.is_empty());
    }

    #[test]
    fn test_points_missing_payload_are_skipped() {
        let raw = r#"{"result":[{"id":"a","score":0.9}]}"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.result[0].payload.is_none());
    }
}
