//! Grounded answer generation support

mod prompt;

pub use prompt::PromptBuilder;
