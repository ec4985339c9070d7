//! Qdrant vector index over gRPC
//!
//! Every point carries the chunk text and its source metadata:
//! `{"page_content": <text>, "metadata": {"filename", "source", "page"?}}`.

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, DeletePointsBuilder,
    Distance, FieldType, Filter, PointStruct, ScoredPoint, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant, QdrantError};
use serde_json::json;
use uuid::Uuid;

use crate::config::QdrantConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkMetadata};

use super::vector_store::{VectorIndex, VectorSearchResult, FILENAME_FIELD};

const CONTENT_KEY: &str = "page_content";
const METADATA_KEY: &str = "metadata";

/// Qdrant-backed vector index
pub struct QdrantIndex {
    client: Qdrant,
}

impl QdrantIndex {
    /// Connect to the configured Qdrant endpoint
    pub fn new(config: &QdrantConfig) -> Result<Self> {
        let mut builder = Qdrant::from_url(&config.url);
        if !config.api_key.is_empty() {
            builder = builder.api_key(config.api_key.clone());
        }
        let client = builder.build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    fn map_err(e: QdrantError) -> Error {
        Error::vector_index(e.to_string())
    }

    /// Map creation failures, singling out the "already exists" response
    fn map_create_err(what: String, e: QdrantError) -> Error {
        match &e {
            QdrantError::ResponseError { status }
                if status.message().to_lowercase().contains("already exists") =>
            {
                Error::AlreadyExists(what)
            }
            _ => Self::map_err(e),
        }
    }

    fn to_point(chunk: &Chunk) -> Result<PointStruct> {
        let mut metadata = json!({
            "filename": chunk.metadata.filename,
            "source": chunk.metadata.source,
        });
        if let Some(page) = chunk.metadata.page {
            metadata["page"] = json!(page);
        }
        let payload = Payload::try_from(json!({
            CONTENT_KEY: chunk.content,
            METADATA_KEY: metadata,
        }))
        .map_err(Self::map_err)?;

        Ok(PointStruct::new(
            chunk.id.to_string(),
            chunk.embedding.clone(),
            payload,
        ))
    }

    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn extract_page(value: &QdrantValue) -> Option<u32> {
        match &value.kind {
            Some(Kind::IntegerValue(n)) => u32::try_from(*n).ok(),
            Some(Kind::DoubleValue(n)) if *n >= 0.0 => Some(*n as u32),
            _ => None,
        }
    }

    fn from_scored(scored: ScoredPoint) -> VectorSearchResult {
        let id = scored
            .id
            .as_ref()
            .and_then(|pid| match &pid.point_id_options {
                Some(PointIdOptions::Uuid(s)) => Uuid::parse_str(s).ok(),
                _ => None,
            })
            .unwrap_or_else(Uuid::nil);

        let content = scored
            .payload
            .get(CONTENT_KEY)
            .and_then(Self::extract_string)
            .unwrap_or_default();

        let mut metadata = ChunkMetadata {
            filename: String::new(),
            source: String::new(),
            page: None,
        };
        if let Some(Kind::StructValue(fields)) =
            scored.payload.get(METADATA_KEY).and_then(|v| v.kind.as_ref())
        {
            let fields = &fields.fields;
            if let Some(filename) = fields.get("filename").and_then(Self::extract_string) {
                metadata.filename = filename;
            }
            if let Some(source) = fields.get("source").and_then(Self::extract_string) {
                metadata.source = source;
            }
            metadata.page = fields.get("page").and_then(Self::extract_page);
        }

        VectorSearchResult {
            chunk: Chunk {
                id,
                content,
                embedding: Vec::new(),
                metadata,
            },
            score: scored.score,
        }
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn collection_exists(&self, collection: &str) -> Result<bool> {
        self.client
            .collection_exists(collection)
            .await
            .map_err(Self::map_err)
    }

    async fn create_collection(&self, collection: &str, dimensions: usize) -> Result<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| Self::map_create_err(format!("collection `{}`", collection), e))?;

        tracing::info!(collection, dimensions, "Created qdrant collection");
        Ok(())
    }

    async fn create_keyword_index(&self, collection: &str, field: &str) -> Result<()> {
        self.client
            .create_field_index(
                CreateFieldIndexCollectionBuilder::new(collection, field, FieldType::Keyword)
                    .wait(true),
            )
            .await
            .map_err(|e| Self::map_create_err(format!("index on `{}`", field), e))?;

        tracing::debug!(collection, field, "Created keyword payload index");
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let points = chunks
            .iter()
            .map(Self::to_point)
            .collect::<Result<Vec<_>>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(Self::map_err)?;

        tracing::debug!(collection, count = chunks.len(), "Upserted points");
        Ok(())
    }

    async fn delete_by_filename(&self, collection: &str, filename: &str) -> Result<()> {
        self.client
            .delete_points(
                DeletePointsBuilder::new(collection)
                    .points(Filter::must([Condition::matches(
                        FILENAME_FIELD,
                        filename.to_string(),
                    )]))
                    .wait(true),
            )
            .await
            .map_err(Self::map_err)?;

        tracing::debug!(collection, filename, "Deleted points by filename");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorSearchResult>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, embedding.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        Ok(response.result.into_iter().map(Self::from_scored).collect())
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(page: Option<u32>) -> Chunk {
        Chunk::new(
            "Refunds take 5 days.",
            ChunkMetadata {
                filename: "faq.pdf".to_string(),
                source: "src/documents/faq.pdf".to_string(),
                page,
            },
        )
        .with_embedding(vec![0.1, 0.2, 0.3])
    }

    #[test]
    fn test_point_payload_layout() {
        let point = QdrantIndex::to_point(&chunk(Some(2))).unwrap();

        let content = point.payload.get(CONTENT_KEY).unwrap();
        assert_eq!(
            QdrantIndex::extract_string(content).as_deref(),
            Some("Refunds take 5 days.")
        );

        match point.payload.get(METADATA_KEY).and_then(|v| v.kind.as_ref()) {
            Some(Kind::StructValue(s)) => {
                assert_eq!(
                    s.fields.get("filename").and_then(QdrantIndex::extract_string).as_deref(),
                    Some("faq.pdf")
                );
                assert_eq!(s.fields.get("page").and_then(QdrantIndex::extract_page), Some(2));
            }
            other => panic!("unexpected metadata payload: {:?}", other),
        }
    }

    #[test]
    fn test_text_chunk_has_no_page() {
        let point = QdrantIndex::to_point(&chunk(None)).unwrap();
        match point.payload.get(METADATA_KEY).and_then(|v| v.kind.as_ref()) {
            Some(Kind::StructValue(s)) => assert!(!s.fields.contains_key("page")),
            other => panic!("unexpected metadata payload: {:?}", other),
        }
    }
}
