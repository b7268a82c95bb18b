use crate::models::*;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// TF-IDF vectoriser fitted on the chunks of the ingested document.
///
/// The vocabulary and IDF weights are fixed at construction, so chunk and query
/// vectors always live in the same space.
#[derive(Debug, Clone)]
pub struct EmbeddingService {
    vocabulary: HashMap<String, usize>,
    idf_scores: Vec<f32>,
}

impl EmbeddingService {
    pub fn fit(chunks: &[DocumentChunk], max_vocabulary: usize) -> Self {
        log::info!("Building TF-IDF vocabulary from {} chunks...", chunks.len());

        let mut word_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_frequencies: HashMap<String, usize> = HashMap::new();
        let total_docs = chunks.len();

        for chunk in chunks {
            let words = tokenize(&chunk.content);
            let unique_words: HashSet<&String> = words.iter().collect();

            for word in unique_words {
                *doc_frequencies.entry(word.clone()).or_insert(0) += 1;
            }
            for word in words {
                *word_counts.entry(word).or_insert(0) += 1;
            }
        }

        // Most frequent words first; alphabetical among equals so the index is reproducible.
        let mut word_freq_pairs: Vec<_> = word_counts.into_iter().collect();
        word_freq_pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        word_freq_pairs.truncate(max_vocabulary);

        let mut vocabulary = HashMap::with_capacity(word_freq_pairs.len());
        let mut idf_scores = Vec::with_capacity(word_freq_pairs.len());
        for (idx, (word, _)) in word_freq_pairs.into_iter().enumerate() {
            let df = doc_frequencies.get(&word).copied().unwrap_or(0);
            idf_scores.push(((1.0 + total_docs as f32) / (1.0 + df as f32)).ln() + 1.0);
            vocabulary.insert(word, idx);
        }

        log::info!("Vocabulary size: {}", vocabulary.len());
        Self {
            vocabulary,
            idf_scores,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn generate_embeddings(&self, chunks: &mut [DocumentChunk]) {
        chunks.par_iter_mut().for_each(|chunk| {
            chunk.embedding = Some(self.create_tfidf_embedding(&chunk.content));
        });
    }

    pub fn embed_query(&self, query: &str) -> Vec<f32> {
        self.create_tfidf_embedding(query)
    }

    fn create_tfidf_embedding(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions()];
        let words = tokenize(text);
        if words.is_empty() {
            return embedding;
        }

        let total_words = words.len() as f32;
        for (word, count) in count_words(&words) {
            if let Some(&idx) = self.vocabulary.get(word) {
                let tf = count as f32 / total_words;
                embedding[idx] = tf * self.idf_scores[idx];
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in embedding.iter_mut() {
                *value /= norm;
            }
        }

        embedding
    }

    pub fn calculate_similarity(embedding1: &[f32], embedding2: &[f32]) -> f32 {
        let min_len = embedding1.len().min(embedding2.len());

        let dot_product: f32 = embedding1[..min_len]
            .iter()
            .zip(embedding2[..min_len].iter())
            .map(|(a, b)| a * b)
            .sum();

        let norm1: f32 = embedding1[..min_len].iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm2: f32 = embedding2[..min_len].iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm1 == 0.0 || norm2 == 0.0 {
            0.0
        } else {
            dot_product / (norm1 * norm2)
        }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|word| word.chars().count() > 2)
        .collect()
}

fn count_words(words: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for word in words {
        *counts.entry(word.as_str()).or_insert(0) += 1;
    }
    counts
}
