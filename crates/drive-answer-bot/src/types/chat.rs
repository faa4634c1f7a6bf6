//! Chat event and answer types

use serde::{Deserialize, Serialize};

/// An inbound text message, one per webhook text-message event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    /// Token used to reply to this message
    pub reply_token: String,
    /// Message text
    pub text: String,
    /// Sender, when the platform discloses it
    pub user_id: Option<String>,
}

/// Why a fallback answer was sent instead of a generated one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// The document index was never built (or is still building)
    NotReady,
    /// Answering this question failed
    ProcessingError,
}

/// How an answer was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum AnswerOrigin {
    /// Generated from retrieved chunks
    Generated { chunks_used: usize },
    /// Fixed fallback message
    Fallback { kind: FallbackKind },
}

/// The text returned to the user; always present, never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub origin: AnswerOrigin,
}

impl Answer {
    /// A generated answer
    pub fn generated(text: String, chunks_used: usize) -> Self {
        Self {
            text,
            origin: AnswerOrigin::Generated { chunks_used },
        }
    }

    /// A fallback answer
    pub fn fallback(text: impl Into<String>, kind: FallbackKind) -> Self {
        Self {
            text: text.into(),
            origin: AnswerOrigin::Fallback { kind },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, AnswerOrigin::Fallback { .. })
    }
}
