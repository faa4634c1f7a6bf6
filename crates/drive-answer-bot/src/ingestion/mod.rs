//! Document ingestion: splitting fetched documents into retrievable chunks

mod chunker;

pub use chunker::{Span, TextChunker};
