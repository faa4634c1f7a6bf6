//! Document and chunk types with source tracking for grounding context

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key for the document title
pub const META_TITLE: &str = "title";
/// Metadata key for the source MIME type
pub const META_MIME_TYPE: &str = "mime_type";
/// Metadata key for the last modification time reported by the source
pub const META_MODIFIED_TIME: &str = "modified_time";
/// Metadata key for the folder path relative to the corpus root
pub const META_PATH: &str = "path";

/// A document fetched from the document source
///
/// Immutable once fetched; dropped after chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Source-assigned identifier
    pub id: String,
    /// Where the document lives (web link)
    pub source: String,
    /// Raw text content
    pub content: String,
    /// Additional metadata (title, path, mime type, ...)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Create a document without metadata
    pub fn new(id: impl Into<String>, source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Title from metadata, falling back to the identifier
    pub fn title(&self) -> &str {
        self.metadata
            .get(META_TITLE)
            .map(String::as_str)
            .unwrap_or(&self.id)
    }
}

/// Source information for a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Document title shown in the grounding context
    pub title: String,
    /// Document location
    pub location: String,
    /// Folder path relative to the corpus root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ChunkSource {
    /// Build source info from the parent document
    pub fn from_document(doc: &Document) -> Self {
        Self {
            title: doc.title().to_string(),
            location: doc.source.clone(),
            path: doc.metadata.get(META_PATH).cloned(),
        }
    }

    /// Format source for display in the grounding context
    pub fn format_label(&self) -> String {
        match &self.path {
            Some(path) if !path.is_empty() => format!("{}/{}", path, self.title),
            _ => self.title.clone(),
        }
    }
}

/// A bounded contiguous span of a document's text, the unit of retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Parent document ID
    pub document_id: String,
    /// Ordinal position within the document
    pub index: u32,
    /// Text content
    pub content: String,
    /// Byte range in the parent document text
    pub byte_start: usize,
    pub byte_end: usize,
    /// Source information for the grounding context
    pub source: ChunkSource,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(
        document_id: String,
        index: u32,
        content: String,
        byte_start: usize,
        byte_end: usize,
        source: ChunkSource,
    ) -> Self {
        Self {
            document_id,
            index,
            content,
            byte_start,
            byte_end,
            source,
        }
    }
}
