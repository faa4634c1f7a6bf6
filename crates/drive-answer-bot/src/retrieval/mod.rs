//! Retrieval: the in-memory vector index and the answer engine built on it

mod engine;
mod index;

pub use engine::RetrievalAnswerEngine;
pub use index::{IndexBuilder, SearchHit, VectorIndex};
