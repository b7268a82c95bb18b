use crate::config::EngineConfig;
use crate::document_processor::DocumentProcessor;
use crate::embedding_service::EmbeddingService;
use crate::error::{EngineError, Result};
use crate::gemini_service::{GeminiService, Generator};
use crate::models::*;
use crate::query_service::QueryService;
use async_trait::async_trait;
use std::sync::Arc;

/// Answers natural-language questions about the ingested document.
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    async fn answer_question(&self, question: &str) -> Result<Answer>;
}

/// Ingest-once, query-many engine over a single PDF.
pub struct RagEngine {
    document: Document,
    query_service: QueryService,
    generator: Arc<dyn Generator>,
}

impl RagEngine {
    /// Parses and indexes the configured PDF and connects to Gemini.
    pub async fn load(config: EngineConfig) -> Result<Self> {
        log::info!("Initialising RagEngine with PDF: {}", config.pdf_path.display());

        let gemini = config
            .gemini
            .clone()
            .ok_or_else(|| EngineError::config("GEMINI_API_KEY environment variable not set"))?;
        let generator: Arc<dyn Generator> = Arc::new(GeminiService::new(gemini)?);

        let processor = DocumentProcessor::new(config.chunk_size, config.chunk_overlap)?;
        let pdf_path = config.pdf_path.clone();
        let document = tokio::task::spawn_blocking(move || processor.process_pdf(&pdf_path))
            .await
            .map_err(|e| EngineError::Task(e.to_string()))??;

        Self::from_document(document, generator, &config)
    }

    /// Builds an engine over an already-processed document.
    pub fn from_document(
        mut document: Document,
        generator: Arc<dyn Generator>,
        config: &EngineConfig,
    ) -> Result<Self> {
        if document.chunks.is_empty() {
            return Err(EngineError::Ingestion(format!(
                "document {} has no chunks",
                document.filename
            )));
        }

        let embedding_service = EmbeddingService::fit(&document.chunks, config.max_vocabulary);
        embedding_service.generate_embeddings(&mut document.chunks);
        log::info!("Generated embeddings for document: {}", document.filename);

        let query_service = QueryService::new(embedding_service, config.top_k, config.max_context_tokens)?;

        Ok(Self {
            document,
            query_service,
            generator,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[async_trait]
impl AnswerEngine for RagEngine {
    async fn answer_question(&self, question: &str) -> Result<Answer> {
        let start_time = std::time::Instant::now();

        let relevant_chunks = self
            .query_service
            .find_relevant_chunks(question, &self.document.chunks);
        let context = self.query_service.build_context(&relevant_chunks);

        let answer = self.generator.generate_response(question, &context).await?;

        log::info!("Answered question in {} ms", start_time.elapsed().as_millis());
        Ok(Answer { answer, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingGenerator {
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Generator for RecordingGenerator {
        async fn generate_response(&self, query: &str, context: &str) -> Result<String> {
            self.seen.lock().unwrap().push((query.to_string(), context.to_string()));
            Ok("It replaces recurrence with attention.".to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate_response(&self, _query: &str, _context: &str) -> Result<String> {
            Err(EngineError::generation("quota exceeded"))
        }
    }

    fn paper() -> Document {
        let text = "The Transformer replaces recurrent layers with multi-headed self-attention. \
                    Training took three and a half days on eight GPUs. \
                    Label smoothing hurts perplexity but improves BLEU.";
        DocumentProcessor::new(80, 10)
            .unwrap()
            .process_text("attention.pdf", text)
    }

    #[tokio::test]
    async fn answers_with_retrieved_context() {
        let generator = Arc::new(RecordingGenerator::default());
        let engine = RagEngine::from_document(paper(), generator.clone(), &EngineConfig::default()).unwrap();

        let answer = engine.answer_question("What does the Transformer replace?").await.unwrap();

        assert_eq!(answer.answer, "It replaces recurrence with attention.");
        assert!(answer.context.contains("The Transformer replaces recurrent layers"));

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "What does the Transformer replace?");
        assert_eq!(seen[0].1, answer.context);
    }

    #[tokio::test]
    async fn generator_failure_propagates() {
        let engine = RagEngine::from_document(paper(), Arc::new(FailingGenerator), &EngineConfig::default()).unwrap();

        let err = engine.answer_question("anything").await.unwrap_err();
        assert!(matches!(err, EngineError::Generation(_)));
    }

    #[test]
    fn chunks_are_embedded_at_construction() {
        let engine = RagEngine::from_document(paper(), Arc::new(FailingGenerator), &EngineConfig::default()).unwrap();
        assert!(engine.document().chunks.len() > 1);
        assert!(engine.document().chunks.iter().all(|c| c.embedding.is_some()));
    }

    #[test]
    fn empty_document_is_rejected() {
        let document = DocumentProcessor::new(80, 10).unwrap().process_text("blank.pdf", "");
        let result = RagEngine::from_document(document, Arc::new(FailingGenerator), &EngineConfig::default());
        assert!(matches!(result, Err(EngineError::Ingestion(_))));
    }

    #[tokio::test]
    async fn load_without_api_key_fails() {
        let config = EngineConfig::default();
        assert!(matches!(RagEngine::load(config).await, Err(EngineError::Config(_))));
    }

    #[tokio::test]
    async fn load_with_missing_pdf_fails() {
        let config = EngineConfig {
            pdf_path: "no/such/paper.pdf".into(),
            gemini: Some(crate::config::GeminiConfig::new("test-key")),
            ..EngineConfig::default()
        };
        assert!(matches!(
            RagEngine::load(config).await,
            Err(EngineError::DocumentNotFound(_))
        ));
    }
}
