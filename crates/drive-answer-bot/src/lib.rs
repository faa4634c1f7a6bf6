//! drive-answer-bot: a LINE chat bot that answers questions from the documents
//! in a Google Drive folder
//!
//! At startup the folder is fetched, chunked and embedded into an in-memory
//! vector index. Each text message is answered by Gemini from the most
//! similar chunks. When the index could not be built the bot still replies,
//! with a fixed fallback message.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod manager;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;
pub mod webhook;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use manager::{NotReadyReason, RagComponents, RagSettings, RagState, RagStateManager};
pub use types::{Answer, Chunk, ChunkSource, Document};
