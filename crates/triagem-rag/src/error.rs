//! Error taxonomy for the triage pipeline.
//!
//! Every failure a request can hit maps to one of these kinds, so the HTTP
//! boundary can pick a status code and a user-facing message without ever
//! leaking upstream bodies or stack traces.

use thiserror::Error;

/// Main error type for triage operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or empty user input.
    #[error("invalid question: {0}")]
    Validation(String),

    /// Valid identifier, no matching patient record.
    #[error("patient not found: {0}")]
    NotFound(String),

    /// Vector backend unreachable or failing.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Completion backend unreachable or returned a malformed response.
    #[error("language model error: {0}")]
    LanguageModel(String),

    /// Broken configuration detected at startup.
    #[error("config error: {0}")]
    Config(String),

    /// Tabular source could not be loaded at startup.
    #[error("ingest error: {0}")]
    Ingest(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for triage operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = Error::Validation("question must not be empty".to_string());
        assert_eq!(err.to_string(), "invalid question: question must not be empty");
    }

    #[test]
    fn test_not_found_display_keeps_identifier() {
        let err = Error::NotFound("007".to_string());
        assert_eq!(err.to_string(), "patient not found: 007");
    }

    #[test]
    fn test_retrieval_display() {
        let err = Error::Retrieval("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
