//! Core types for the answer bot

pub mod chat;
pub mod document;

pub use chat::{Answer, AnswerOrigin, ChatEvent, FallbackKind};
pub use document::{Chunk, ChunkSource, Document};
