use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/ask";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub api_url: String,
}

impl UiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("RAG_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { api_url }
    }
}

#[derive(Debug, Serialize)]
struct AskPayload<'a> {
    question: &'a str,
}

/// Successful `/ask` body as the UI reads it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnswerResponse {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub context: String,
}

/// The one call the UI makes against the service.
#[async_trait]
pub trait AskApi: Send + Sync {
    async fn ask(&self, question: &str) -> Result<AnswerResponse>;
}

pub struct ApiClient {
    client: Client,
    api_url: String,
}

impl ApiClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl AskApi for ApiClient {
    async fn ask(&self, question: &str) -> Result<AnswerResponse> {
        log::debug!("POST {}", self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .json(&AskPayload { question })
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
