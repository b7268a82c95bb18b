pub mod config;
pub mod document_processor;
pub mod embedding_service;
pub mod engine;
pub mod error;
pub mod gemini_service;
pub mod models;
pub mod query_service;

pub use config::{EngineConfig, GeminiConfig};
pub use document_processor::DocumentProcessor;
pub use embedding_service::EmbeddingService;
pub use engine::{AnswerEngine, RagEngine};
pub use error::EngineError;
pub use gemini_service::{GeminiService, Generator};
pub use models::*;
pub use query_service::QueryService;
