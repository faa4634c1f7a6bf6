//! Prompt templates for grounded generation

use crate::retrieval::SearchHit;

/// Prompt builder for retrieval-grounded questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the grounding context from ranked hits
    ///
    /// Each chunk is numbered in rank order and labelled with its document.
    pub fn build_context(hits: &[SearchHit<'_>]) -> String {
        hits.iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "[{}] {}\n{}",
                    i + 1,
                    hit.chunk.source.format_label(),
                    hit.chunk.content.trim()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full prompt sent to the generation model
    pub fn build_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer. Answer in the same language as the question.

{context}

Question: {question}
Helpful Answer:"#,
            context = context,
            question = question.trim(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkSource};

    fn chunk(title: &str, content: &str) -> Chunk {
        Chunk::new(
            title.to_lowercase(),
            0,
            content.to_string(),
            0,
            content.len(),
            ChunkSource {
                title: title.to_string(),
                location: format!("https://drive.google.com/file/d/{}/view", title),
                path: None,
            },
        )
    }

    #[test]
    fn test_context_numbers_hits_in_rank_order() {
        let first = chunk("Geography", "The capital of Thailand is Bangkok.");
        let second = chunk("History", "Ayutthaya was an earlier capital.\n");
        let hits = vec![
            SearchHit { chunk: &first, score: 0.9 },
            SearchHit { chunk: &second, score: 0.4 },
        ];

        let context = PromptBuilder::build_context(&hits);
        assert_eq!(
            context,
            "[1] Geography\nThe capital of Thailand is Bangkok.\n\n[2] History\nAyutthaya was an earlier capital."
        );
    }

    #[test]
    fn test_prompt_places_context_before_question() {
        let prompt = PromptBuilder::build_prompt("  What is the capital? ", "[1] Doc\nBangkok");
        let context_at = prompt.find("[1] Doc").unwrap();
        let question_at = prompt.find("Question: What is the capital?").unwrap();

        assert!(context_at < question_at);
        assert!(prompt.contains("just say that you don't know"));
        assert!(prompt.ends_with("Helpful Answer:"));
    }

    #[test]
    fn test_empty_hits_give_empty_context() {
        assert!(PromptBuilder::build_context(&[]).is_empty());
    }
}
