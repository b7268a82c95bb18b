use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures raised while building the engine or answering a question.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("failed to ingest document: {0}")]
    Ingestion(String),

    #[error("no extractable text in {}", .0.display())]
    EmptyDocument(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(reqwest::Error),

    #[error("answer generation failed: {0}")]
    Generation(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("background task failed: {0}")]
    Task(String),
}

impl EngineError {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// Request URLs are dropped so endpoint details never reach logs.
impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}
