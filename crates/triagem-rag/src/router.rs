//! Query routing: identifier lookup vs semantic retrieval.
//!
//! The router inspects the raw question, picks a retrieval strategy,
//! orchestrates the stores and gateways and assembles the final result.
//! It is stateless across calls; everything it touches lives in the shared
//! [`AppContext`].

use std::sync::Arc;
use std::sync::LazyLock;

use crate::context::AppContext;
use crate::error::{Error, Result};
use crate::types::QueryResult;

static IDENTIFIER_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\d+").expect("digit regex is valid"));

/// Extract the candidate patient identifier: the first run of consecutive
/// decimal digits. When a question carries several numbers the first one
/// wins; ambiguous input is not disambiguated further.
fn extract_identifier(question: &str) -> Option<&str> {
    IDENTIFIER_RE.find(question).map(|m| m.as_str())
}

pub struct QueryRouter {
    ctx: Arc<AppContext>,
}

impl QueryRouter {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Answer one question. Empty or whitespace-only input is a validation
    /// failure before any backend is touched.
    pub async fn handle(&self, question: &str) -> Result<QueryResult> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::Validation("question must not be empty".into()));
        }

        match extract_identifier(question) {
            Some(identifier) => self.id_path(question, identifier).await,
            None => self.semantic_path(question).await,
        }
    }

    /// Exact-match path: look the identifier up, summarize and classify the
    /// stored report, then match specialists.
    async fn id_path(&self, question: &str, identifier: &str) -> Result<QueryResult> {
        tracing::debug!(identifier, "taking the id path");

        let record = self.ctx.patients.lookup(identifier).ok_or_else(|| {
            tracing::warn!(identifier, question, "patient lookup missed");
            Error::NotFound(identifier.to_string())
        })?;

        let summary = self
            .ctx
            .gateway
            .summarize(&record.report)
            .await
            .map_err(|e| Self::stage_failure("id", "summarize", question, e))?;

        let specialty = self
            .ctx
            .gateway
            .classify_specialty(&record.report)
            .await
            .map_err(|e| Self::stage_failure("id", "classify_specialty", question, e))?;

        let specialists = self.matched_specialists(&specialty);

        tracing::info!(
            identifier,
            specialty = %specialty,
            matches = specialists.len(),
            "id path completed"
        );
        Ok(QueryResult::id_match(summary, specialty, specialists))
    }

    /// Semantic path: retrieve supporting passages, classify the raw
    /// question, synthesize a grounded answer, then match specialists.
    async fn semantic_path(&self, question: &str) -> Result<QueryResult> {
        let k = self.ctx.config.search.top_k;
        tracing::debug!(k, "taking the semantic path");

        let passages = self
            .ctx
            .index
            .search(question, k)
            .await
            .map_err(|e| Self::stage_failure("semantic", "search", question, e))?;

        // Zero passages is a valid outcome: the model answers from the
        // persona instruction alone.
        if passages.is_empty() {
            tracing::debug!(question, "retrieval returned no passages");
        }
        let context_text = passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        // Classification runs on the raw question, not the retrieved
        // context: the specialty follows from what the patient asked.
        let specialty = self
            .ctx
            .gateway
            .classify_specialty(question)
            .await
            .map_err(|e| Self::stage_failure("semantic", "classify_specialty", question, e))?;

        let answer = self
            .ctx
            .gateway
            .answer(&context_text, question)
            .await
            .map_err(|e| Self::stage_failure("semantic", "answer", question, e))?;

        let specialists = self.matched_specialists(&specialty);

        tracing::info!(
            passages = passages.len(),
            specialty = %specialty,
            matches = specialists.len(),
            "semantic path completed"
        );
        Ok(QueryResult::semantic(answer, specialty, specialists))
    }

    fn matched_specialists(&self, specialty: &str) -> Vec<crate::types::Specialist> {
        self.ctx
            .specialists
            .match_label(specialty)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Log the complete failure context before propagating. No partial
    /// result ever leaves the router after an upstream failure.
    fn stage_failure(path: &str, stage: &str, question: &str, error: Error) -> Error {
        tracing::error!(path, stage, question, error = %error, "pipeline stage failed");
        error
    }
}
