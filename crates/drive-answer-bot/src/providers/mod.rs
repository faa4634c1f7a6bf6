//! Provider abstractions for embeddings, generation and the document source
//!
//! The pipeline only talks to these traits; the Google implementations live
//! in [`gcp`], and tests swap in in-memory fakes.

pub mod document_source;
pub mod embedding;
pub mod gcp;
pub mod llm;

pub use document_source::{DocumentSource, ServiceAccountKey};
pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
