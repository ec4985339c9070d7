//! Prompt composition and reference handling for answers

pub mod citation;
pub mod prompt;

pub use citation::{build_references, truncate_preview};
pub use prompt::{ChatPrompt, PromptBuilder};
