use crate::embedding_service::EmbeddingService;
use crate::error::{EngineError, Result};
use crate::models::*;
use std::cmp::Ordering;
use tiktoken_rs::CoreBPE;

/// Ranks chunks against a question and packs the best ones into a prompt context.
pub struct QueryService {
    embedding_service: EmbeddingService,
    bpe: CoreBPE,
    top_k: usize,
    max_context_tokens: usize,
}

impl QueryService {
    pub fn new(embedding_service: EmbeddingService, top_k: usize, max_context_tokens: usize) -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| EngineError::Tokenizer(e.to_string()))?;

        Ok(Self {
            embedding_service,
            bpe,
            top_k,
            max_context_tokens,
        })
    }

    pub fn find_relevant_chunks(&self, query: &str, chunks: &[DocumentChunk]) -> Vec<ScoredChunk> {
        let query_embedding = self.embedding_service.embed_query(query);

        let mut chunk_scores: Vec<ScoredChunk> = chunks
            .iter()
            .filter_map(|chunk| {
                let embedding = chunk.embedding.as_ref()?;
                let score = EmbeddingService::calculate_similarity(&query_embedding, embedding);
                (score > 0.0).then(|| ScoredChunk {
                    chunk: chunk.clone(),
                    score,
                })
            })
            .collect();

        if chunk_scores.is_empty() {
            // Nothing shares a term with the question; hand the model the opening passages.
            log::info!("No chunk matched the query, falling back to the first {} chunks", self.top_k);
            return chunks
                .iter()
                .take(self.top_k)
                .map(|chunk| ScoredChunk {
                    chunk: chunk.clone(),
                    score: 0.0,
                })
                .collect();
        }

        chunk_scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        chunk_scores.truncate(self.top_k);

        log::info!("Found {} relevant chunks", chunk_scores.len());
        chunk_scores
    }

    /// Joins passages in rank order until the token budget is spent. The first passage is
    /// always kept.
    pub fn build_context(&self, chunks: &[ScoredChunk]) -> String {
        let mut passages: Vec<&str> = Vec::with_capacity(chunks.len());
        let mut used_tokens = 0;

        for scored in chunks {
            let tokens = self.bpe.encode_with_special_tokens(&scored.chunk.content).len();
            if !passages.is_empty() && used_tokens + tokens > self.max_context_tokens {
                log::debug!("Context token budget reached after {} passages", passages.len());
                break;
            }
            used_tokens += tokens;
            passages.push(&scored.chunk.content);
        }

        passages.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(contents: &[&str]) -> Vec<DocumentChunk> {
        let mut chunks: Vec<DocumentChunk> = contents
            .iter()
            .enumerate()
            .map(|(i, content)| DocumentChunk {
                id: format!("chunk-{i}"),
                content: content.to_string(),
                start_position: 0,
                end_position: content.chars().count(),
                embedding: None,
            })
            .collect();
        EmbeddingService::fit(&chunks, 1000).generate_embeddings(&mut chunks);
        chunks
    }

    fn service_for(chunks: &[DocumentChunk], top_k: usize, max_tokens: usize) -> QueryService {
        QueryService::new(EmbeddingService::fit(chunks, 1000), top_k, max_tokens).unwrap()
    }

    #[test]
    fn ranks_matching_chunk_first_and_limits_results() {
        let chunks = chunks(&[
            "positional encodings inject order information",
            "the transformer replaces recurrent layers with self attention",
            "dropout is applied to the output of each sub layer",
            "self attention layers connect all positions",
        ]);
        let service = service_for(&chunks, 2, 3000);

        let results = service.find_relevant_chunks("What does the transformer replace recurrent layers with?", &chunks);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "chunk-1");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn falls_back_to_leading_chunks_when_nothing_matches() {
        let chunks = chunks(&["encoder stack", "decoder stack", "attention heads"]);
        let service = service_for(&chunks, 2, 3000);

        let results = service.find_relevant_chunks("zebra", &chunks);
        let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["chunk-0", "chunk-1"]);
    }

    #[test]
    fn context_joins_passages_in_order() {
        let chunks = chunks(&["first passage here", "second passage here"]);
        let service = service_for(&chunks, 2, 3000);
        let scored: Vec<ScoredChunk> = chunks
            .iter()
            .map(|c| ScoredChunk { chunk: c.clone(), score: 1.0 })
            .collect();

        assert_eq!(service.build_context(&scored), "first passage here\n\nsecond passage here");
    }

    #[test]
    fn context_respects_token_budget_but_keeps_first_passage() {
        let long = "attention ".repeat(50);
        let chunks = chunks(&[long.trim(), "short tail passage"]);
        let service = service_for(&chunks, 2, 5);
        let scored: Vec<ScoredChunk> = chunks
            .iter()
            .map(|c| ScoredChunk { chunk: c.clone(), score: 1.0 })
            .collect();

        assert_eq!(service.build_context(&scored), long.trim());
    }
}
