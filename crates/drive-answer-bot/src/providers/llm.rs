//! LLM provider trait for generating answers

use async_trait::async_trait;
use crate::error::Result;

/// Trait for LLM-based answer generation
///
/// Implementations:
/// - `GeminiClient`: Gemini API (gemini-1.5-flash)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate an answer given a question and its grounding context
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
