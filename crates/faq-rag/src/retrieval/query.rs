//! Query pipeline: retrieve, compose a prompt, generate, attach references

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::{build_references, PromptBuilder};
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::types::QueryResponse;

use super::collection::CollectionManager;

/// Answers questions from the indexed documents
pub struct QueryPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    collection: Arc<CollectionManager>,
}

impl QueryPipeline {
    /// Create a new query pipeline
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        collection: Arc<CollectionManager>,
    ) -> Self {
        Self {
            embedder,
            llm,
            collection,
        }
    }

    /// Answer `question` from the `k` most similar chunks
    pub async fn query(&self, question: &str, k: usize) -> Result<QueryResponse> {
        if k == 0 {
            return Err(Error::InvalidInput("k must be at least 1".to_string()));
        }

        if !self.collection.exists().await? {
            tracing::info!("Collection '{}' does not exist yet", self.collection.name());
            return Ok(QueryResponse::no_documents());
        }

        tracing::info!("Querying for: {}", question);
        let query_embedding = self.embedder.embed_query(question).await?;

        let results = match self
            .collection
            .index()
            .search(self.collection.name(), &query_embedding, k)
            .await
        {
            Ok(results) => results,
            // The collection may have been dropped between the check and the search
            Err(e) => {
                if !self.collection.exists().await.unwrap_or(true) {
                    return Ok(QueryResponse::no_documents());
                }
                return Err(e);
            }
        };

        tracing::debug!("Found {} chunk(s)", results.len());
        if results.is_empty() {
            return Ok(QueryResponse::not_found());
        }

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_rag_prompt(question, &context);

        tracing::debug!("Generating answer with {}", self.llm.model());
        let answer = self.llm.generate(&prompt).await?;

        let references = build_references(&results);
        Ok(QueryResponse::new(answer, references, results.len()))
    }
}
