//! Language model gateway.
//!
//! Wraps a completion backend behind three typed operations. Each operation
//! is a single round trip with a bounded deadline and no retry — retry, if
//! ever wanted, is the caller's policy, not the gateway's.

pub mod openai;
pub mod prompts;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};

pub use openai::OpenAiBackend;

/// Blocking request/response contract to the completion backend.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String>;
}

pub struct LanguageModelGateway {
    backend: Arc<dyn CompletionBackend>,
    timeout: Duration,
    max_tokens: usize,
}

impl LanguageModelGateway {
    pub fn new(backend: Arc<dyn CompletionBackend>, timeout: Duration, max_tokens: usize) -> Self {
        Self {
            backend,
            timeout,
            max_tokens,
        }
    }

    /// Summarize a medical report: a few sentences, next steps highlighted.
    /// Output is plain text with no structural contract.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let raw = self
            .complete_bounded(&prompts::summarize_prompt(text), "summarize")
            .await?;
        Ok(raw.trim().to_string())
    }

    /// Classify the medical specialty indicated by a clinical text.
    ///
    /// The model is instructed to answer with a name only, but the output
    /// is still untrusted free text: fences, quotes and stray punctuation
    /// are stripped here, and the directory lowercases it again at match
    /// time.
    pub async fn classify_specialty(&self, text: &str) -> Result<String> {
        let raw = self
            .complete_bounded(&prompts::classify_prompt(text), "classify_specialty")
            .await?;
        Ok(clean_label(&raw))
    }

    /// Open-domain answer grounded in the supplied retrieval context.
    pub async fn answer(&self, context: &str, question: &str) -> Result<String> {
        let raw = self
            .complete_bounded(&prompts::answer_prompt(context, question), "answer")
            .await?;
        Ok(raw.trim().to_string())
    }

    async fn complete_bounded(&self, prompt: &str, operation: &str) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.backend.complete(prompt, self.max_tokens))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::LanguageModel(format!(
                "{} exceeded the {}s deadline",
                operation,
                self.timeout.as_secs()
            ))),
        }
    }
}

/// Normalize a classification label: drop markdown fences, surrounding
/// quotes and trailing punctuation, and keep only the first line.
fn clean_label(raw: &str) -> String {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let first_line = cleaned.lines().next().unwrap_or("");
    first_line
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim_end_matches(|c: char| c == '.' || c == '!' || c == ':' || c == ';')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend returning a canned response, for exercising the gateway
    /// without a network.
    struct CannedBackend {
        response: String,
    }

    #[async_trait]
    impl CompletionBackend for CannedBackend {
        async fn complete(&self, _prompt: &str, _max_tokens: usize) -> Result<String> {
            Ok(self.response.clone())
        }
    }

    /// Backend that never answers, for deadline tests.
    struct StalledBackend;

    #[async_trait]
    impl CompletionBackend for StalledBackend {
        async fn complete(&self, _prompt: &str, _max_tokens: usize) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("stalled backend should always be timed out");
        }
    }

    fn gateway(response: &str) -> LanguageModelGateway {
        LanguageModelGateway::new(
            Arc::new(CannedBackend {
                response: response.to_string(),
            }),
            Duration::from_secs(5),
            256,
        )
    }

    #[test]
    fn test_clean_label_strips_quotes_and_punctuation() {
        assert_eq!(clean_label("\"Cardiologia\"."), "Cardiologia");
        assert_eq!(clean_label("  Ortopedia!  "), "Ortopedia");
        assert_eq!(clean_label("```\nDermatologia\n```"), "Dermatologia");
        assert_eq!(clean_label("```json\nCardiologia\n```"), "Cardiologia");
    }

    #[test]
    fn test_clean_label_keeps_first_line_only() {
        assert_eq!(
            clean_label("Cardiologia\nJustificativa: dor no peito"),
            "Cardiologia"
        );
    }

    #[test]
    fn test_clean_label_empty_input() {
        assert_eq!(clean_label("   "), "");
    }

    #[tokio::test]
    async fn test_classify_cleans_model_output() {
        let gateway = gateway("\"Cardiologia\".\n");
        let label = gateway.classify_specialty("dor no peito").await.unwrap();
        assert_eq!(label, "Cardiologia");
    }

    #[tokio::test]
    async fn test_summarize_trims_output() {
        let gateway = gateway("  Procure um cardiologista.  \n");
        let summary = gateway.summarize("laudo").await.unwrap();
        assert_eq!(summary, "Procure um cardiologista.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_maps_to_language_model_error() {
        let gateway = LanguageModelGateway::new(
            Arc::new(StalledBackend),
            Duration::from_millis(50),
            256,
        );
        let err = gateway.answer("", "pergunta").await.unwrap_err();
        assert!(matches!(err, Error::LanguageModel(_)));
        assert!(err.to_string().contains("deadline"));
    }
}
