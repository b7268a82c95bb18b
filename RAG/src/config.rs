use crate::error::{EngineError, Result};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PDF_PATH: &str = "data/attention.pdf";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: 0.3,
            max_output_tokens: 1000,
        }
    }
}

/// Everything the engine needs to ingest the paper and answer questions.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub pdf_path: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub max_vocabulary: usize,
    pub top_k: usize,
    pub max_context_tokens: usize,
    /// `None` when no API key is configured; the engine refuses to start without one.
    pub gemini: Option<GeminiConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from(DEFAULT_PDF_PATH),
            chunk_size: 500,
            chunk_overlap: 50,
            max_vocabulary: 1000,
            top_k: 4,
            max_context_tokens: 3000,
            gemini: None,
        }
    }
}

impl EngineConfig {
    /// Builds the config from a key lookup, usually `|key| std::env::var(key).ok()`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("RAG_PDF_PATH") {
            config.pdf_path = PathBuf::from(path);
        }
        if let Some(top_k) = parse_var::<usize, _>(&lookup, "RAG_TOP_K")? {
            if top_k == 0 {
                return Err(EngineError::config("RAG_TOP_K must be at least 1"));
            }
            config.top_k = top_k;
        }

        config.gemini = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| {
                let mut gemini = GeminiConfig::new(api_key);
                if let Some(model) = lookup("GEMINI_MODEL") {
                    gemini.model = model;
                }
                if let Some(base_url) = lookup("GEMINI_BASE_URL") {
                    gemini.base_url = base_url.trim_end_matches('/').to_string();
                }
                gemini
            });

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| EngineError::config(format!("invalid {key} '{raw}': {e}"))),
        None => Ok(None),
    }
}
