//! Hosted Mistral API client for chat completions and embeddings
//!
//! HTTP 429 responses surface as the structured `Error::RateLimited` kind
//! so the retry policy can distinguish them without string sniffing.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Mistral API client implementing both provider traits
pub struct MistralClient {
    client: Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequestMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl MistralClient {
    /// Create a new client from LLM configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Map a non-success upstream response to an error, preserving the
    /// rate-limit signal for HTTP 429.
    async fn upstream_error(response: reqwest::Response, what: &str) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            Error::RateLimited(format!("{} failed: HTTP 429 - {}", what, body))
        } else {
            Error::Llm(format!("{} failed: HTTP {} - {}", what, status, body))
        }
    }
}

#[async_trait]
impl LlmProvider for MistralClient {
    async fn generate_answer(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let request = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![ChatRequestMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response, "Generation").await);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("Failed to parse generation response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Llm("Generation response contained no choices".to_string()))
    }

    fn name(&self) -> &str {
        "mistral"
    }

    fn model(&self) -> &str {
        &self.config.chat_model
    }
}

#[async_trait]
impl EmbeddingProvider for MistralClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::Llm("Embedding response was empty".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/v1/embeddings", self.config.base_url);

        let request = EmbeddingsRequest {
            model: self.config.embed_model.clone(),
            input: texts.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response, "Embedding").await);
        }

        let embed_response: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("Failed to parse embedding response: {}", e)))?;

        if embed_response.data.len() != texts.len() {
            return Err(Error::Llm(format!(
                "Embedding count mismatch: asked for {}, got {}",
                texts.len(),
                embed_response.data.len()
            )));
        }

        Ok(embed_response
            .data
            .into_iter()
            .map(|d| d.embedding)
            .collect())
    }

    fn name(&self) -> &str {
        "mistral"
    }
}
