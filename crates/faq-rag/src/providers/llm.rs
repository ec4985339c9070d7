//! LLM provider trait for generating answers

use async_trait::async_trait;
use crate::error::Result;
use crate::generation::ChatPrompt;

/// Trait for LLM-based answer generation
///
/// Implementations:
/// - `GeminiLlm`: Google Generative Language API (gemini-2.5-flash)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run a two-role prompt and return the full generated text
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
