use crate::error::{EngineError, Result};
use crate::models::*;
use pdf_extract::extract_text;
use regex::Regex;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

/// Turns the source PDF into a cleaned document split into overlapping chunks.
pub struct DocumentProcessor {
    chunk_size: usize,
    overlap: usize,
    re_whitespace: Regex,
    re_special: Regex,
}

impl DocumentProcessor {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(EngineError::config("chunk size must be greater than zero"));
        }
        if overlap >= chunk_size {
            return Err(EngineError::config("chunk overlap must be smaller than the chunk size"));
        }

        let re_whitespace = Regex::new(r"\s+").map_err(|e| EngineError::Ingestion(e.to_string()))?;
        let re_special = Regex::new(r"[^\w\s.,!?;:()\-\[\]{}%=+/'<>]")
            .map_err(|e| EngineError::Ingestion(e.to_string()))?;

        Ok(Self {
            chunk_size,
            overlap,
            re_whitespace,
            re_special,
        })
    }

    pub fn process_pdf(&self, file_path: &Path) -> Result<Document> {
        if !file_path.is_file() {
            return Err(EngineError::DocumentNotFound(file_path.to_path_buf()));
        }

        let filename = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string());

        log::info!("Processing PDF: {}", filename);

        let raw = extract_text(file_path).map_err(|e| EngineError::Ingestion(e.to_string()))?;
        let document = self.process_text(&filename, &raw);

        if document.chunks.is_empty() {
            return Err(EngineError::EmptyDocument(file_path.to_path_buf()));
        }

        log::info!("Created {} chunks from {}", document.chunks.len(), filename);
        Ok(document)
    }

    /// Cleans and chunks already-extracted text.
    pub fn process_text(&self, filename: &str, raw: &str) -> Document {
        let content = self.clean_text(raw);
        let chunks = self.create_chunks(&content);

        Document {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            content,
            chunks,
        }
    }

    fn clean_text(&self, text: &str) -> String {
        let cleaned = self.re_special.replace_all(text, " ");
        let cleaned = self.re_whitespace.replace_all(&cleaned, " ");

        cleaned.trim().to_string()
    }

    /// Byte ranges of the trimmed sentences in `text`.
    fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
        text.split_sentence_bound_indices()
            .filter_map(|(idx, sentence)| {
                let trimmed = sentence.trim();
                if trimmed.is_empty() {
                    return None;
                }
                let start = idx + (sentence.len() - sentence.trim_start().len());
                Some((start, start + trimmed.len()))
            })
            .collect()
    }

    fn create_chunks(&self, content: &str) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();
        let mut current: Option<(usize, usize)> = None;

        for (sentence_start, sentence_end) in Self::sentence_spans(content) {
            let Some((start, end)) = current else {
                current = Some((sentence_start, sentence_end));
                continue;
            };

            if char_len(&content[start..sentence_end]) <= self.chunk_size {
                current = Some((start, sentence_end));
                continue;
            }

            chunks.push(self.make_chunk(content, start, end));

            // Carry the tail of the previous chunk only if the next sentence still fits.
            let next_start = match self.overlap_start(content, start, end) {
                Some(overlap_start)
                    if overlap_start < sentence_start
                        && char_len(&content[overlap_start..sentence_end]) <= self.chunk_size =>
                {
                    overlap_start
                }
                _ => sentence_start,
            };
            current = Some((next_start, sentence_end));
        }

        if let Some((start, end)) = current {
            chunks.push(self.make_chunk(content, start, end));
        }

        chunks
    }

    /// Start of the last `overlap` characters before `end`, moved forward to a word boundary.
    fn overlap_start(&self, content: &str, chunk_start: usize, end: usize) -> Option<usize> {
        if self.overlap == 0 {
            return None;
        }

        let Some((idx, _)) = content[chunk_start..end].char_indices().rev().nth(self.overlap - 1) else {
            return Some(chunk_start);
        };
        let idx = chunk_start + idx;

        match content[idx..end].find(' ') {
            Some(space) => Some(idx + space + 1),
            None => Some(idx),
        }
    }

    fn make_chunk(&self, content: &str, start: usize, end: usize) -> DocumentChunk {
        let start_position = char_len(&content[..start]);
        let text = content[start..end].trim().to_string();

        DocumentChunk {
            id: Uuid::new_v4().to_string(),
            end_position: start_position + char_len(&content[start..end]),
            start_position,
            content: text,
            embedding: None,
        }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
