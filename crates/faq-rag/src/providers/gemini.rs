//! Gemini clients for embeddings and answer generation
//!
//! Both talk to the Generative Language REST API with an API key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::generation::ChatPrompt;
use crate::providers::embedding::EmbeddingProvider;
use crate::providers::llm::LlmProvider;

/// Maximum number of texts per `batchEmbedContents` request
const MAX_BATCH_SIZE: usize = 100;

const API_KEY_HEADER: &str = "x-goog-api-key";

fn http_client(config: &GeminiConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Read a non-success response into an error message
async fn failure_body(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("({}): {}", status, body)
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

// ---------------------------------------------------------------------------
// Embeddings
// ---------------------------------------------------------------------------

/// Embedding provider backed by `text-embedding-004`
pub struct GeminiEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiEmbedder {
    /// Create a new embedder from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.embedding_model.clone(),
        })
    }

    fn model_path(&self) -> String {
        format!("models/{}", self.model)
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}:{}", self.base_url, self.model_path(), method)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    content: Content,
    task_type: &'static str,
}

#[derive(Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: None,
            content: Content::text(None, text),
            task_type: "RETRIEVAL_QUERY",
        };

        let response = self
            .client
            .post(self.endpoint("embedContent"))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::embedding(format!(
                "Gemini embedding failed {}",
                failure_body(response).await
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse Gemini response: {}", e)))?;

        if embed_response.embedding.values.is_empty() {
            return Err(Error::embedding("Empty embedding in response"));
        }
        Ok(embed_response.embedding.values)
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_BATCH_SIZE) {
            let request = BatchEmbedRequest {
                requests: batch
                    .iter()
                    .map(|text| EmbedRequest {
                        model: Some(self.model_path()),
                        content: Content::text(None, text),
                        task_type: "RETRIEVAL_DOCUMENT",
                    })
                    .collect(),
            };

            let response = self
                .client
                .post(self.endpoint("batchEmbedContents"))
                .header(API_KEY_HEADER, &self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| Error::embedding(format!("Gemini batch request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(Error::embedding(format!(
                    "Gemini batch embedding failed {}",
                    failure_body(response).await
                )));
            }

            let batch_response: BatchEmbedResponse = response.json().await.map_err(|e| {
                Error::embedding(format!("Failed to parse Gemini batch response: {}", e))
            })?;

            if batch_response.embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    batch_response.embeddings.len()
                )));
            }

            all_embeddings.extend(batch_response.embeddings.into_iter().map(|e| e.values));
        }

        tracing::debug!("Embedded {} texts with {}", texts.len(), self.model);
        Ok(all_embeddings)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Chat model used to write answers, `gemini-2.5-flash` by default
pub struct GeminiLlm {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiLlm {
    /// Create a new generation client from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.generation_model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiLlm {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String> {
        let request = GenerateRequest {
            system_instruction: Content::text(None, &prompt.system),
            contents: vec![Content::text(Some("user"), &prompt.user)],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::llm(format!(
                "Gemini generation failed {}",
                failure_body(response).await
            )));
        }

        let gen_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse Gemini response: {}", e)))?;

        gen_response
            .into_text()
            .ok_or_else(|| Error::llm("No text in Gemini response"))
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_request_shape() {
        let request = EmbedRequest {
            model: Some("models/text-embedding-004".to_string()),
            content: Content::text(None, "hello"),
            task_type: "RETRIEVAL_DOCUMENT",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["taskType"], "RETRIEVAL_DOCUMENT");
        assert_eq!(json["content"]["parts"][0]["text"], "hello");
        assert!(json["content"].get("role").is_none());
    }

    #[test]
    fn test_generate_response_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"<p>Hi"},{"text":"</p>"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().as_deref(), Some("<p>Hi</p>"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.into_text().is_none());
    }

    #[test]
    fn test_endpoints() {
        let config = GeminiConfig {
            base_url: "http://localhost:9000/v1beta/".to_string(),
            ..Default::default()
        };
        let embedder = GeminiEmbedder::new(&config).unwrap();
        assert_eq!(
            embedder.endpoint("embedContent"),
            "http://localhost:9000/v1beta/models/text-embedding-004:embedContent"
        );
        let llm = GeminiLlm::new(&config).unwrap();
        assert_eq!(
            llm.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
