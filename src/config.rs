//! Configuration for the document Q&A server

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Hosted LLM/embedding API configuration
    pub llm: LlmConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Conversational memory configuration
    pub memory: MemoryConfig,
    /// Document store configuration
    pub documents: DocumentsConfig,
}

impl RagConfig {
    /// Build configuration from environment variables, falling back to defaults.
    ///
    /// `MISTRAL_API_KEY` is required; see [`RagConfig::validate`].
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("MISTRAL_API_KEY") {
            config.llm.api_key = key;
        }
        if let Ok(url) = std::env::var("MISTRAL_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Ok(dir) = std::env::var("DOCUMENTS_DIR") {
            config.documents.storage_dir = PathBuf::from(dir);
        }
        if let Ok(doc) = std::env::var("DEFAULT_DOCUMENT") {
            config.documents.default_document = doc;
        }

        config
    }

    /// Validate that required settings are present.
    ///
    /// A missing API credential is a fatal configuration error at startup.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.is_empty() {
            return Err(Error::Config(
                "MISTRAL_API_KEY is not set; the hosted LLM API requires a credential".to_string(),
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 10MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_size: 10 * 1024 * 1024,
        }
    }
}

/// Hosted LLM/embedding API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// API key (from MISTRAL_API_KEY)
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// Chat model name
    pub chat_model: String,
    /// Embedding model name
    pub embed_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Attempt bound for rate-limited calls (1 = no retry)
    pub max_attempts: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mistral.ai".to_string(),
            api_key: String::new(),
            chat_model: "mistral-small-latest".to_string(),
            embed_model: "mistral-embed".to_string(),
            temperature: 0.2, // Lower for more factual answers
            timeout_secs: 60,
            max_attempts: 3,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Minimum chunk size (skip smaller chunks)
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            chunk_overlap: 200,
            min_chunk_size: 50,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks fed to the LLM per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Conversational memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Number of recent turns kept verbatim before folding into the summary
    pub max_turns: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { max_turns: 6 }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Directory holding the uploadable/activatable documents
    pub storage_dir: PathBuf,
    /// Document activated at startup when present
    pub default_document: String,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("documents"),
            default_document: "essay.txt".to_string(),
        }
    }
}
