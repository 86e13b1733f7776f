//! Application context: every component the router needs, built once at
//! startup and shared read-only across request tasks.
//!
//! This replaces module-level globals with an explicit object, so tests can
//! assemble a context from in-process fakes.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::embeddings::EmbeddingClient;
use crate::error::Result;
use crate::llm::{LanguageModelGateway, OpenAiBackend};
use crate::retrieval::{QdrantIndex, VectorSearch};
use crate::store::{PatientStore, SpecialistDirectory};

pub struct AppContext {
    pub config: Config,
    pub patients: PatientStore,
    pub specialists: SpecialistDirectory,
    pub index: Arc<dyn VectorSearch>,
    pub gateway: LanguageModelGateway,
}

impl AppContext {
    /// Wire up the production context: load both stores, build the Qdrant
    /// index and the completion backend from config. Any failure here is
    /// fatal — the process must not serve traffic on a partial context.
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        let api_key = Config::api_key()?;
        let timeout = Duration::from_secs(config.search.timeout_secs);

        let patients = PatientStore::load_dir(&config.data.patients_dir)?;
        let specialists = SpecialistDirectory::load_csv(&config.data.specialists_csv)?;

        let embedder = EmbeddingClient::new(
            config.llm.api_base.clone(),
            api_key.clone(),
            config.llm.embedding_model.clone(),
            timeout,
        )?;
        let index: Arc<dyn VectorSearch> =
            Arc::new(QdrantIndex::new(&config.qdrant, embedder, timeout)?);

        let backend = Arc::new(OpenAiBackend::new(&config.llm, api_key, timeout)?);
        let gateway = LanguageModelGateway::new(backend, timeout, config.llm.max_tokens);

        Ok(Self {
            config,
            patients,
            specialists,
            index,
            gateway,
        })
    }
}
