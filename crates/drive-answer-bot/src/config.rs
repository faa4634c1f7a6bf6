//! Configuration for the answer bot
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables (the deployment platform injects secrets that way).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Deployment secret-file location, checked before the local fallback
pub const DEPLOYED_CREDENTIALS_PATH: &str = "/etc/secrets/credentials.json";
/// Local development credentials file, relative to the working directory
pub const LOCAL_CREDENTIALS_PATH: &str = "credentials.json";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// LINE messaging platform configuration
    pub line: LineConfig,
    /// Google Drive document source configuration
    pub drive: DriveConfig,
    /// Gemini embedding/generation configuration
    pub gemini: GeminiConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Startup lifecycle configuration
    pub startup: StartupConfig,
    /// User-facing fallback replies
    pub fallback: FallbackMessages,
}

/// A secret value that never shows up in `Debug` output
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw value
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum webhook body size in bytes (default: 1MB)
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_size: 1024 * 1024,
        }
    }
}

/// LINE messaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Channel access token used for the reply API
    pub channel_access_token: Secret,
    /// Channel secret used to verify webhook signatures
    pub channel_secret: Secret,
    /// Messaging API base URL
    pub api_base_url: String,
    /// Header carrying the body signature
    pub signature_header: String,
    /// Reply request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_access_token: Secret::default(),
            channel_secret: Secret::default(),
            api_base_url: "https://api.line.me".to_string(),
            signature_header: "x-line-signature".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Google Drive document source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Folder holding the corpus
    pub folder_id: Option<String>,
    /// Service-account key candidates, first existing file wins
    pub credentials_paths: Vec<PathBuf>,
    /// Walk sub-folders
    pub recursive: bool,
    /// Drive API base URL
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Files larger than this are skipped (default: 50MB)
    pub max_file_bytes: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            folder_id: None,
            credentials_paths: vec![
                PathBuf::from(DEPLOYED_CREDENTIALS_PATH),
                PathBuf::from(LOCAL_CREDENTIALS_PATH),
            ],
            recursive: true,
            api_base_url: "https://www.googleapis.com".to_string(),
            timeout_secs: 60,
            max_file_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key for the Generative Language API
    pub api_key: Secret,
    /// API base URL
    pub base_url: String,
    /// Embedding model name
    pub embedding_model: String,
    /// Generation model name
    pub generation_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
    /// Texts per batchEmbedContents call (API limit: 100)
    pub embed_batch_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: Secret::default(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            embedding_model: "embedding-001".to_string(),
            generation_model: "gemini-1.5-flash".to_string(),
            temperature: 0.2,
            max_output_tokens: 1024,
            embed_batch_size: 100,
            timeout_secs: 30,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in grapheme clusters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, must be below `chunk_size`
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks handed to the generator per question
    pub top_k: usize,
    /// Bound on each model call made while answering, in seconds
    pub answer_timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            answer_timeout_secs: 45,
        }
    }
}

/// Startup lifecycle configuration
///
/// Initialization runs once per process. There is no timed retry: a failed
/// build stays `NotReady` until the process is restarted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Bound on the whole fetch/chunk/embed pass, in seconds
    pub init_timeout_secs: u64,
    /// Exit with an error instead of serving fallbacks when the build fails,
    /// leaving recovery to the process supervisor
    pub exit_on_failure: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            init_timeout_secs: 900,
            exit_on_failure: false,
        }
    }
}

/// Replies used when no grounded answer can be produced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackMessages {
    /// Sent while the document index is not available
    pub not_ready: String,
    /// Sent when answering a question failed
    pub processing_error: String,
}

impl Default for FallbackMessages {
    fn default() -> Self {
        Self {
            not_ready: "The document system is unavailable right now (still loading, or check the credentials/folder ID).".to_string(),
            processing_error: "Sorry, something went wrong while searching the documents.".to_string(),
        }
    }
}

impl RagConfig {
    /// Load defaults, an optional TOML file, then process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Some(token) = get("LINE_CHANNEL_ACCESS_TOKEN") {
            self.line.channel_access_token = Secret::new(token);
        }
        if let Some(secret) = get("LINE_CHANNEL_SECRET") {
            self.line.channel_secret = Secret::new(secret);
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini.api_key = Secret::new(key);
        }
        if let Some(folder) = get("GOOGLE_DRIVE_FOLDER_ID") {
            self.drive.folder_id = Some(folder);
        }
        if let Some(path) = get("GOOGLE_CREDENTIALS_PATH") {
            let path = PathBuf::from(path);
            self.drive.credentials_paths.retain(|p| p != &path);
            self.drive.credentials_paths.insert(0, path);
        }
        if let Some(recursive) = get("DRIVE_RECURSIVE").and_then(|v| parse_bool(&v)) {
            self.drive.recursive = recursive;
        }
        if let Some(size) = get("RAG_CHUNK_SIZE").and_then(|v| v.parse().ok()) {
            self.chunking.chunk_size = size;
        }
        if let Some(overlap) = get("RAG_CHUNK_OVERLAP").and_then(|v| v.parse().ok()) {
            self.chunking.chunk_overlap = overlap;
        }
        if let Some(top_k) = get("RAG_TOP_K").and_then(|v| v.parse().ok()) {
            self.retrieval.top_k = top_k;
        }
    }

    /// Reject settings the process cannot safely start with
    ///
    /// A missing Gemini key or folder id is not fatal here; the bot starts
    /// and reports itself not ready instead.
    pub fn validate(&self) -> Result<()> {
        if self.line.channel_secret.is_empty() {
            return Err(Error::Config(
                "LINE_CHANNEL_SECRET is required to verify webhook signatures".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(Error::Config("Server port must be non-zero".to_string()));
        }
        self.chunking.validate()?;
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".to_string()));
        }
        if self.gemini.embed_batch_size == 0 {
            return Err(Error::Config(
                "gemini.embed_batch_size must be at least 1".to_string(),
            ));
        }
        if self.line.channel_access_token.is_empty() {
            tracing::warn!("LINE_CHANNEL_ACCESS_TOKEN is not set; replies will be rejected");
        }
        Ok(())
    }

    /// Server bind address
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ChunkingConfig {
    /// Check the size/overlap pair
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be at least 1".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
