//! Corpus bootstrap for the vector index.
//!
//! Runs once at startup: an existing collection is reused as-is, otherwise
//! the collection is created and every patient report is indexed. The
//! existence check makes repeated starts idempotent; safety under truly
//! concurrent first starts rests on the backend's create semantics.

use uuid::Uuid;

use crate::error::Result;
use crate::retrieval::{IndexDocument, VectorSearch};
use crate::store::PatientStore;

pub async fn bootstrap_index(index: &dyn VectorSearch, patients: &PatientStore) -> Result<()> {
    if index.collection_exists().await? {
        tracing::info!("collection already exists, reusing it");
        return Ok(());
    }

    tracing::info!("collection not found, creating and indexing the corpus");
    index.create_collection().await?;

    let documents: Vec<IndexDocument> = patients
        .records()
        .map(|record| IndexDocument {
            id: Uuid::new_v4(),
            patient_id: record.identifier.clone(),
            text: record.report.clone(),
        })
        .collect();

    index.upsert(&documents).await?;
    tracing::info!(documents = documents.len(), "patient corpus indexed");
    Ok(())
}
