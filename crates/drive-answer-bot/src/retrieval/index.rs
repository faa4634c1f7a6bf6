//! In-memory vector index with exact cosine search
//!
//! The index is built once and never mutated, so searches take `&self` and
//! need no locking.

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

/// A ranked search result borrowing from the index
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub chunk: &'a Chunk,
    /// Cosine similarity to the query
    pub score: f32,
}

struct Entry {
    chunk: Chunk,
    vector: Vec<f32>,
    norm: f32,
}

/// Immutable set of chunk embeddings
pub struct VectorIndex {
    entries: Vec<Entry>,
    dimension: usize,
}

impl VectorIndex {
    /// Build from chunk/vector pairs, checking every vector has one shared,
    /// non-zero dimension
    pub fn from_entries(pairs: Vec<(Chunk, Vec<f32>)>) -> Result<Self> {
        let dimension = match pairs.first() {
            Some((_, vector)) => vector.len(),
            None => return Err(Error::EmptyCorpus),
        };
        if dimension == 0 {
            return Err(Error::embedding("Embedding model returned zero-length vectors"));
        }

        let mut entries = Vec::with_capacity(pairs.len());
        for (chunk, vector) in pairs {
            if vector.len() != dimension {
                return Err(Error::embedding(format!(
                    "Mixed embedding dimensions: expected {}, got {} for chunk {} of {}",
                    dimension,
                    vector.len(),
                    chunk.index,
                    chunk.document_id
                )));
            }
            let norm = l2_norm(&vector);
            entries.push(Entry { chunk, vector, norm });
        }

        Ok(Self { entries, dimension })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Top `k` chunks by cosine similarity, best first
    ///
    /// Equal scores keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit<'_>>> {
        if query.len() != self.dimension {
            return Err(Error::embedding(format!(
                "Query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            )));
        }

        let query_norm = l2_norm(query);
        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .map(|entry| SearchHit {
                chunk: &entry.chunk,
                score: cosine(query, query_norm, &entry.vector, entry.norm),
            })
            .collect();

        // sort_by is stable
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }
}

fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|v| v * v).sum::<f32>().sqrt()
}

fn cosine(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    let denom = a_norm * b_norm;
    if denom <= f32::EPSILON {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let score = dot / denom;
    // Overflowing norms give inf / inf; -0.0 would sort below 0.0
    if score.is_nan() || score == 0.0 {
        0.0
    } else {
        score
    }
}

/// Embeds chunks and assembles the [`VectorIndex`]
pub struct IndexBuilder {
    batch_size: usize,
}

impl IndexBuilder {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Embed all chunks and index them
    ///
    /// Fails with [`Error::EmptyCorpus`] before calling the provider when
    /// there is nothing to embed.
    pub async fn build(&self, chunks: Vec<Chunk>, embedder: &dyn EmbeddingProvider) -> Result<VectorIndex> {
        if chunks.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embedded = embedder.embed_documents(&texts).await?;
            if embedded.len() != texts.len() {
                return Err(Error::embedding(format!(
                    "{} returned {} vectors for {} chunks",
                    embedder.name(),
                    embedded.len(),
                    texts.len()
                )));
            }
            vectors.extend(embedded);
        }

        let index = VectorIndex::from_entries(chunks.into_iter().zip(vectors).collect())?;
        tracing::info!(
            "Indexed {} chunks ({} dimensions) with {}",
            index.len(),
            index.dimension(),
            embedder.name()
        );
        Ok(index)
    }
}
