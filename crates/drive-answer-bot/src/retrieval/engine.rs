//! Retrieval-augmented answering over a built index

use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::VectorIndex;
use crate::types::Answer;

/// Answers questions from the top-K most similar chunks
pub struct RetrievalAnswerEngine {
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
    /// Applied separately to query embedding and to generation
    step_timeout: Duration,
}

impl RetrievalAnswerEngine {
    pub fn new(
        index: VectorIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
        step_timeout: Duration,
    ) -> Self {
        Self {
            index,
            embedder,
            llm,
            top_k: top_k.max(1),
            step_timeout,
        }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Embed the query, retrieve, and generate a grounded answer
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let query_vector = tokio::time::timeout(self.step_timeout, self.embedder.embed_query(query))
            .await
            .map_err(|_| {
                Error::embedding(format!(
                    "Query embedding timed out after {}s",
                    self.step_timeout.as_secs()
                ))
            })??;

        let hits = self.index.search(&query_vector, self.top_k)?;
        tracing::debug!(
            "Retrieved {} chunks (best score {:.3})",
            hits.len(),
            hits.first().map(|h| h.score).unwrap_or(0.0)
        );

        let context = PromptBuilder::build_context(&hits);
        let text = tokio::time::timeout(self.step_timeout, self.llm.generate_answer(query, &context))
            .await
            .map_err(|_| {
                Error::generation(format!(
                    "{} timed out after {}s",
                    self.llm.model(),
                    self.step_timeout.as_secs()
                ))
            })??;

        if text.trim().is_empty() {
            return Err(Error::generation("Model returned an empty answer"));
        }

        Ok(Answer::generated(text, hits.len()))
    }
}
