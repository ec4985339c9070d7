//! Prompt templates for RAG generation

use crate::providers::vector_store::VectorSearchResult;

/// Separator placed between retrieved chunks in the context block
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

const SYSTEM_PROMPT: &str = r#"You are a helpful assistant that answers questions based on the provided context.
Format your response using HTML tags (e.g., <b>, <ul>, <li>, <p>, <br>).
Do not include <html>, <head>, or <body> tags, just the content.
When you use information from a source, DO NOT use inline citations in the text.
Instead, list all unique references at the end of your answer in a separate section in the <li> tags.
If the answer is not specifically mentioned in the context, respond with general knowledge and say you did not find the information in the context."#;

/// A two-turn chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    /// System instruction
    pub system: String,
    /// Human turn
    pub user: String,
}

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from search results, in retrieval order
    pub fn build_context(results: &[VectorSearchResult]) -> String {
        results
            .iter()
            .map(|result| {
                format!(
                    "[Source: {}]\n{}",
                    Self::display_filename(result),
                    result.chunk.content
                )
            })
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }

    /// Filename shown for a result, falling back to the basename of its source
    fn display_filename(result: &VectorSearchResult) -> String {
        let metadata = &result.chunk.metadata;
        if !metadata.filename.is_empty() {
            return metadata.filename.clone();
        }
        if metadata.source.is_empty() {
            return "unknown".to_string();
        }
        crate::types::document::basename(std::path::Path::new(&metadata.source))
    }

    /// Build the full RAG prompt
    pub fn build_rag_prompt(question: &str, context: &str) -> ChatPrompt {
        ChatPrompt {
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "Context:\n{context}\n\nQuestion: {question}\n\nAnswer the question based on the context above using HTML formatting. List unique references at the end.",
                context = context,
                question = question
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkMetadata};

    fn result(filename: &str, content: &str) -> VectorSearchResult {
        VectorSearchResult {
            chunk: Chunk::new(
                content,
                ChunkMetadata {
                    filename: filename.to_string(),
                    source: format!("src/documents/{}", filename),
                    page: None,
                },
            ),
            score: 0.9,
        }
    }

    #[test]
    fn test_build_context() {
        let context = PromptBuilder::build_context(&[
            result("a.txt", "Refunds take 5 days."),
            result("b.txt", "Shipping is free."),
        ]);
        assert_eq!(
            context,
            "[Source: a.txt]\nRefunds take 5 days.\n\n---\n\n[Source: b.txt]\nShipping is free."
        );
    }

    #[test]
    fn test_context_falls_back_to_source_basename() {
        let mut r = result("", "text");
        r.chunk.metadata.source = "docs/guide.md".to_string();
        assert_eq!(PromptBuilder::build_context(&[r]), "[Source: guide.md]\ntext");
    }

    #[test]
    fn test_build_rag_prompt() {
        let prompt = PromptBuilder::build_rag_prompt("How long do refunds take?", "CTX");
        assert!(prompt.system.contains("HTML tags"));
        assert!(prompt.system.contains("<li>"));
        assert!(prompt.user.starts_with("Context:\nCTX\n\nQuestion: How long do refunds take?\n\n"));
        assert!(prompt.user.ends_with("List unique references at the end."));
    }
}
