//! Configuration for the RAG system
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file). Secrets have no defaults and must be present at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main RAG system configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Qdrant connection and collection
    pub qdrant: QdrantConfig,
    /// Gemini embedding and generation
    pub gemini: GeminiConfig,
    /// Text chunking configuration
    pub chunking: ChunkingConfig,
    /// Document store configuration
    pub documents: DocumentsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
    /// Directory with the static frontend
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_size: 50 * 1024 * 1024,
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Qdrant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Qdrant gRPC endpoint
    pub url: String,
    /// Qdrant API key
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Collection holding all points of this application
    pub collection_name: String,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            collection_name: "my_knowledge_base".to_string(),
        }
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Google API key
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Generative Language API base URL
    pub base_url: String,
    /// Embedding model name
    pub embedding_model: String,
    /// Generation model name
    pub generation_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            embedding_model: "text-embedding-004".to_string(),
            generation_model: "gemini-2.5-flash".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
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

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Directory holding uploaded documents
    pub dir: PathBuf,
    /// Upload cap
    pub max_documents: usize,
    /// Index the whole directory before serving
    pub index_on_startup: bool,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("src/documents"),
            max_documents: 20,
            index_on_startup: true,
        }
    }
}

impl RagConfig {
    /// Load configuration from the process environment, reading `.env` first
    /// when one exists.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Failed to read .env file: {}", e);
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();

        config.qdrant.url = get("QDRANT_URL").unwrap_or_default();
        config.qdrant.api_key = get("QDRANT_API_KEY").unwrap_or_default();
        config.gemini.api_key = get("GOOGLE_API_KEY").unwrap_or_default();

        if let Some(name) = get("COLLECTION_NAME") {
            config.qdrant.collection_name = name;
        }
        if let Some(dir) = get("DOCUMENTS_DIR") {
            config.documents.dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("STATIC_DIR") {
            config.server.static_dir = PathBuf::from(dir);
        }
        if let Some(host) = get("HOST") {
            config.server.host = host;
        }
        if let Some(port) = get("PORT") {
            config.server.port = parse_var("PORT", &port)?;
        }
        if let Some(model) = get("EMBEDDING_MODEL") {
            config.gemini.embedding_model = model;
        }
        if let Some(model) = get("GENERATION_MODEL") {
            config.gemini.generation_model = model;
        }
        if let Some(url) = get("GEMINI_BASE_URL") {
            config.gemini.base_url = url;
        }
        if let Some(flag) = get("INDEX_ON_STARTUP") {
            config.documents.index_on_startup = parse_var("INDEX_ON_STARTUP", &flag)?;
        }
        if let Some(max) = get("MAX_DOCUMENTS") {
            config.documents.max_documents = parse_var("MAX_DOCUMENTS", &max)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Ensure required secrets are present and numeric settings are sane
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("QDRANT_URL", &self.qdrant.url),
            ("QDRANT_API_KEY", &self.qdrant.api_key),
            ("GOOGLE_API_KEY", &self.gemini.api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing required settings: {}. Set them in the environment or a .env file",
                missing.join(", ")
            )));
        }

        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid value for {}: '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let vars = env(&[
            ("QDRANT_URL", "http://localhost:6334"),
            ("QDRANT_API_KEY", "qk"),
            ("GOOGLE_API_KEY", "gk"),
        ]);
        let config = RagConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.qdrant.collection_name, "my_knowledge_base");
        assert_eq!(config.documents.dir, PathBuf::from("src/documents"));
        assert_eq!(config.documents.max_documents, 20);
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
    }

    #[test]
    fn test_missing_secrets_fail() {
        let vars = env(&[("QDRANT_URL", "http://localhost:6334"), ("GOOGLE_API_KEY", " ")]);
        let err = RagConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("QDRANT_API_KEY"));
        assert!(msg.contains("GOOGLE_API_KEY"));
        assert!(!msg.contains("QDRANT_URL"));
    }

    #[test]
    fn test_overrides() {
        let vars = env(&[
            ("QDRANT_URL", "http://q:6334"),
            ("QDRANT_API_KEY", "qk"),
            ("GOOGLE_API_KEY", "gk"),
            ("COLLECTION_NAME", "faq"),
            ("DOCUMENTS_DIR", "/data/docs"),
            ("PORT", "9000"),
            ("INDEX_ON_STARTUP", "false"),
        ]);
        let config = RagConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.qdrant.collection_name, "faq");
        assert_eq!(config.documents.dir, PathBuf::from("/data/docs"));
        assert_eq!(config.server.port, 9000);
        assert!(!config.documents.index_on_startup);
    }

    #[test]
    fn test_bad_port_rejected() {
        let vars = env(&[
            ("QDRANT_URL", "http://q:6334"),
            ("QDRANT_API_KEY", "qk"),
            ("GOOGLE_API_KEY", "gk"),
            ("PORT", "eighty"),
        ]);
        assert!(matches!(
            RagConfig::from_lookup(|k| vars.get(k).cloned()),
            Err(Error::Config(_))
        ));
    }
}
