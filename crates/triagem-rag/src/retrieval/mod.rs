//! Semantic retrieval over the clinical corpus.
//!
//! The vector backend is a black box behind the [`VectorSearch`] trait:
//! documents go in, ranked passages come out. The production implementation
//! talks to Qdrant over REST; tests substitute in-process fakes.

pub mod qdrant;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::RetrievedPassage;

pub use qdrant::QdrantIndex;

/// A document handed to the index at bootstrap time.
#[derive(Debug, Clone)]
pub struct IndexDocument {
    pub id: Uuid,
    pub patient_id: String,
    pub text: String,
}

/// Contract for the vector-search backend.
///
/// `search` returning an empty list is a valid outcome (nothing similar
/// enough in the corpus); an unreachable backend is `Error::Retrieval` and
/// must propagate, never be swallowed into an empty result.
#[async_trait]
pub trait VectorSearch: Send + Sync {
    async fn collection_exists(&self) -> Result<bool>;

    async fn create_collection(&self) -> Result<()>;

    async fn upsert(&self, documents: &[IndexDocument]) -> Result<()>;

    /// Ranked supporting passages for a free-text query, most similar first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>>;
}
