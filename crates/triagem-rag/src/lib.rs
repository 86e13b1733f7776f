pub mod config;
pub mod context;
pub mod embeddings;
pub mod error;
pub mod indexing;
pub mod llm;
pub mod retrieval;
pub mod router;
pub mod store;
pub mod types;

// Re-export primary types for convenience
pub use config::Config;
pub use context::AppContext;
pub use error::{Error, Result};
pub use router::QueryRouter;
pub use types::{PatientRecord, QueryMode, QueryResult, RetrievedPassage, Specialist};
