//! Text chunking with overlap and position tracking
//!
//! Sizes are counted in extended grapheme clusters so combining marks (Thai
//! vowels and tone marks, accents) never end up separated from their base.

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::{Chunk, ChunkSource, Document};

/// A chunk boundary as byte offsets into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Fixed-size overlapping chunker
///
/// Window ends prefer a line break in the back half of the window, then any
/// whitespace, then a hard cut. Consecutive windows always share exactly
/// `overlap` graphemes.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in graphemes
    chunk_size: usize,
    /// Overlap between consecutive chunks in graphemes
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker, rejecting `overlap >= chunk_size` up front
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        ChunkingConfig {
            chunk_size,
            chunk_overlap: overlap,
        }
        .validate()?;

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Create from config
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split documents into chunks, in document order
    pub fn split(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for doc in documents {
            let source = ChunkSource::from_document(doc);
            let mut index = 0u32;

            for span in self.split_text(&doc.content) {
                let content = &doc.content[span.start..span.end];
                if content.trim().is_empty() {
                    continue;
                }
                chunks.push(Chunk::new(
                    doc.id.clone(),
                    index,
                    content.to_string(),
                    span.start,
                    span.end,
                    source.clone(),
                ));
                index += 1;
            }

            tracing::debug!("Chunked '{}' into {} chunks", doc.title(), index);
        }

        chunks
    }

    /// Compute chunk boundaries for one text
    pub fn split_text(&self, text: &str) -> Vec<Span> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let graphemes: Vec<(usize, &str)> = text.grapheme_indices(true).collect();
        let len = graphemes.len();

        if len <= self.chunk_size {
            return vec![Span {
                start: 0,
                end: text.len(),
            }];
        }

        let byte_at = |i: usize| if i == len { text.len() } else { graphemes[i].0 };

        let mut spans = Vec::new();
        let mut start = 0usize;

        loop {
            let hard_end = (start + self.chunk_size).min(len);
            let end = if hard_end == len {
                len
            } else {
                self.snap_end(&graphemes, start, hard_end)
            };

            spans.push(Span {
                start: byte_at(start),
                end: byte_at(end),
            });

            if end == len {
                break;
            }
            // end > start + overlap, so this always advances
            start = end - self.overlap;
        }

        spans
    }

    /// Pick a window end in `(start + overlap, hard_end]`
    fn snap_end(&self, graphemes: &[(usize, &str)], start: usize, hard_end: usize) -> usize {
        let floor = start + self.overlap + 1;
        let soft_floor = floor.max(start + self.chunk_size / 2);

        let is_break = |i: usize, pred: fn(&str) -> bool| i < graphemes.len() && pred(graphemes[i].1);

        if let Some(end) = (soft_floor..=hard_end).rev().find(|&i| is_break(i, is_newline)) {
            return end;
        }
        if let Some(end) = (floor..=hard_end).rev().find(|&i| is_break(i, is_whitespace)) {
            return end;
        }
        hard_end
    }
}

fn is_newline(g: &str) -> bool {
    g.contains('\n')
}

fn is_whitespace(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}
