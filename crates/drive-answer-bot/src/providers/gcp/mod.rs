//! Google implementations of the provider traits
//!
//! - [`GoogleDriveSource`]: Drive v3 folder listing, export and download,
//!   authenticated with a service account
//! - [`GeminiClient`]: Gemini embeddings and generation, authenticated with
//!   an API key

mod auth;
mod drive;
mod gemini;

pub use auth::{GcpAuth, DRIVE_READONLY_SCOPE};
pub use drive::{GoogleDriveSource, ReadPlan};
pub use gemini::{GeminiClient, TaskType};
