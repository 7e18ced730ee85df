//! Retrieval-augmented pipeline: capability traits and the chain factory

pub mod factory;
pub mod rag_chain;

pub use factory::RagChainFactory;
pub use rag_chain::RagChain;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::memory::MemorySnapshot;

/// Answer produced by a pipeline invocation
#[derive(Debug, Clone)]
pub struct AskOutcome {
    /// The synthesized answer
    pub answer: String,
}

/// Capability object turning a natural-language question into an answer
/// using a retrieval step over the active document plus a hosted LLM call.
///
/// Owns its conversational memory; the memory never outlives a document swap.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Answer a question, recording the turn in conversational memory
    async fn ask(&self, question: &str) -> Result<AskOutcome>;

    /// Snapshot the conversational memory (explicit DTO, no introspection)
    fn memory_snapshot(&self) -> MemorySnapshot;

    /// Clear messages and the rolling summary
    fn reset_memory(&self);
}

/// Builds a fresh pipeline for a document path.
///
/// Fails with `Error::Document` when the file is missing, unreadable or
/// empty, and with `Error::Config` when the upstream credential is absent.
#[async_trait]
pub trait PipelineFactory: Send + Sync {
    async fn build(&self, document_path: &Path) -> Result<Arc<dyn Pipeline>>;
}
