use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub qdrant: QdrantConfig,
    pub llm: LlmConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory of patient record CSV files.
    pub patients_dir: PathBuf,
    /// Specialist directory CSV.
    pub specialists_csv: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    pub url: String,
    pub collection: String,
    pub vector_dim: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API base, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Passages requested per semantic query.
    pub top_k: usize,
    /// Deadline applied to every outbound backend call.
    pub timeout_secs: u64,
}

impl Config {
    /// Validate config values, rejecting clearly broken configurations.
    pub fn validate(&self) -> Result<()> {
        if self.qdrant.collection.trim().is_empty() {
            return Err(Error::Config("qdrant.collection must not be empty".into()));
        }
        if self.qdrant.vector_dim == 0 {
            return Err(Error::Config("qdrant.vector_dim must be > 0".into()));
        }
        if self.search.top_k == 0 {
            return Err(Error::Config("search.top_k must be > 0".into()));
        }
        if self.search.timeout_secs == 0 {
            return Err(Error::Config("search.timeout_secs must be > 0".into()));
        }
        if self.llm.max_tokens == 0 {
            return Err(Error::Config("llm.max_tokens must be > 0".into()));
        }
        Ok(())
    }

    /// Load config from a JSON file. A missing file falls back to defaults;
    /// an unreadable or invalid file is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file absent, using defaults");
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// The completion/embedding API key. Secrets stay out of the config
    /// file; only the environment provides them.
    pub fn api_key() -> Result<String> {
        std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::Config("OPENAI_API_KEY is not set".into()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                patients_dir: PathBuf::from("data/pacientes"),
                specialists_csv: PathBuf::from("data/medicos.csv"),
            },
            qdrant: QdrantConfig {
                url: std::env::var("QDRANT_URL")
                    .unwrap_or_else(|_| "http://localhost:6333".to_string()),
                collection: "health".to_string(),
                vector_dim: 1536,
            },
            llm: LlmConfig {
                api_base: "https://api.openai.com/v1".to_string(),
                chat_model: "gpt-4o-mini".to_string(),
                embedding_model: "text-embedding-3-small".to_string(),
                temperature: 0.1,
                max_tokens: 512,
            },
            search: SearchConfig {
                top_k: 3,
                timeout_secs: 30,
            },
        }
    }
}
