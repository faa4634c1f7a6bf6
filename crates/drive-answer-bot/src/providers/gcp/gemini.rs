//! Gemini API client for embeddings and answer generation
//!
//! Authenticates with an API key (`x-goog-api-key`). One client serves both
//! the [`EmbeddingProvider`] and [`LlmProvider`] seams.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::{GeminiConfig, Secret};
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::embedding::EmbeddingProvider;
use crate::providers::llm::LlmProvider;

const API_KEY_HEADER: &str = "x-goog-api-key";
const TOP_P: f32 = 0.95;

/// Embedding task types understood by the Gemini embedding models
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
}

/// Gemini client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Secret,
    embedding_model: String,
    generation_model: String,
    temperature: f32,
    max_output_tokens: u32,
    batch_size: usize,
}

impl GeminiClient {
    /// Create a new Gemini client from config
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            embedding_model: model_path(&config.embedding_model),
            generation_model: model_path(&config.generation_model),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            batch_size: config.embed_batch_size.max(1),
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/{}:{}", self.base_url, model, method)
    }

    /// Embed one batch (at most `batch_size` texts)
    async fn embed_batch(&self, texts: &[String], task_type: TaskType) -> Result<Vec<Vec<f32>>> {
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: &self.embedding_model,
                    content: Content::user_text(text),
                    task_type,
                })
                .collect(),
        };

        let response = self
            .client
            .post(self.endpoint(&self.embedding_model, "batchEmbedContents"))
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Embedding request rejected ({}): {}",
                status, body
            )));
        }

        let parsed: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        let vectors: Vec<Vec<f32>> = parsed.embeddings.into_iter().map(|e| e.values).collect();
        if vectors.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

/// Normalize a model name to the `models/...` resource form
fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[derive(serde::Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content,
    task_type: TaskType,
}

#[derive(serde::Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(serde::Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user_text(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Result<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::generation("Gemini returned no candidates"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::generation(format!(
                "Gemini returned an empty candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self
            .embed_batch(&[text.to_string()], TaskType::RetrievalQuery)
            .await?;
        vectors
            .pop()
            .ok_or_else(|| Error::embedding("No embedding returned for query"))
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut all = Vec::with_capacity(texts.len());
        for (i, batch) in texts.chunks(self.batch_size).enumerate() {
            tracing::debug!("Embedding batch {} ({} texts)", i + 1, batch.len());
            all.extend(self.embed_batch(batch, TaskType::RetrievalDocument).await?);
        }
        Ok(all)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content::user_text(&PromptBuilder::build_prompt(question, context))],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
                top_p: TOP_P,
            },
        };

        let response = self
            .client
            .post(self.endpoint(&self.generation_model, "generateContent"))
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::generation(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "Gemini generation failed ({}): {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("Failed to parse Gemini response: {}", e)))?;

        parsed.into_text()
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        self.generation_model.trim_start_matches("models/")
    }
}
