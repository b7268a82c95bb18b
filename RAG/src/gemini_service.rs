use crate::config::GeminiConfig;
use crate::error::{EngineError, Result};
use crate::models::*;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Upper bound on one Gemini call. Kept below the UI's request timeout so the
/// service answers with its own error before the client gives up.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(50);

/// Produces an answer from a question and the passages retrieved for it.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate_response(&self, query: &str, context: &str) -> Result<String>;
}

pub struct GeminiService {
    client: Client,
    config: GeminiConfig,
}

impl GeminiService {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(EngineError::config("GEMINI_API_KEY environment variable not set"));
        }

        let client = Client::builder()
            .timeout(GENERATION_TIMEOUT)
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn build_request(&self, prompt: String) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            }),
        }
    }
}

#[async_trait]
impl Generator for GeminiService {
    async fn generate_response(&self, query: &str, context: &str) -> Result<String> {
        let request = self.build_request(build_prompt(query, context));

        log::debug!("Sending prompt to {}", self.config.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EngineError::generation(format!("Gemini API error ({status}): {error_text}")));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        extract_answer(gemini_response)
    }
}

fn extract_answer(response: GeminiResponse) -> Result<String> {
    let answer: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if answer.trim().is_empty() {
        return Err(EngineError::generation("Gemini returned no answer text"));
    }
    Ok(answer.trim().to_string())
}

pub fn build_prompt(query: &str, context: &str) -> String {
    format!(
        r#"You are an expert assistant answering questions about the research paper "Attention Is All You Need", using only the excerpts provided below.

INSTRUCTIONS:
1. Answer the question using ONLY the information in the excerpts
2. Be concise but comprehensive
3. If the excerpts don't contain enough information to answer the question, say so clearly
4. Do not add information not present in the excerpts

EXCERPTS:
{context}

QUESTION: {query}

ANSWER:"#
    )
}
