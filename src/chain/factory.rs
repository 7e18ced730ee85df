//! Builds fresh retrieval-augmented chains from document paths

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::{self, TextChunker};
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::ChunkIndex;

use super::{Pipeline, PipelineFactory, RagChain};

/// Factory producing a `RagChain` per document: load, chunk, embed, assemble.
pub struct RagChainFactory {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    chunker: TextChunker,
    top_k: usize,
    max_history_turns: usize,
}

impl RagChainFactory {
    /// Create a factory from configuration and providers
    pub fn new(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            embedder,
            llm,
            chunker: TextChunker::new(
                config.chunking.chunk_size,
                config.chunking.chunk_overlap,
                config.chunking.min_chunk_size,
            ),
            top_k: config.retrieval.top_k,
            max_history_turns: config.memory.max_turns,
        }
    }
}

#[async_trait]
impl PipelineFactory for RagChainFactory {
    async fn build(&self, document_path: &Path) -> Result<Arc<dyn Pipeline>> {
        let content = ingestion::load_document(document_path).await?;

        let chunks = self.chunker.chunk(&content);
        if chunks.is_empty() {
            return Err(Error::Document(format!(
                "Document '{}' produced no usable text",
                document_path.display()
            )));
        }

        tracing::info!(
            "Building chain for '{}': {} chunks, embedding with {}",
            document_path.display(),
            chunks.len(),
            self.embedder.name()
        );

        let embeddings = self.embedder.embed_batch(&chunks).await?;
        let index = ChunkIndex::new(chunks, embeddings);

        Ok(Arc::new(RagChain::new(
            index,
            Arc::clone(&self.embedder),
            Arc::clone(&self.llm),
            self.top_k,
            self.max_history_turns,
        )))
    }
}
