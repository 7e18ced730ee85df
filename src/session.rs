//! Active-document session: the single mutable slot behind the server
//!
//! At most one document backs the pipeline at any time, and the two are
//! always consistent: the slot is only ever replaced wholesale, after a
//! fresh pipeline has been built successfully. Once a document has been
//! activated the session never returns to the uninitialized state.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::chain::{AskOutcome, Pipeline, PipelineFactory};
use crate::error::{Error, Result};
use crate::memory::MemorySnapshot;
use crate::retry::RetryPolicy;
use crate::storage::DocumentStore;
use crate::types::DocumentInfo;

/// The active document and its pipeline, replaced together
struct ActiveDocument {
    filename: String,
    pipeline: Arc<dyn Pipeline>,
}

/// Outcome of a reset-memory request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Memory on the active pipeline was cleared
    Cleared,
    /// No pipeline is active; nothing to reset (a warning, not an error)
    NothingToReset,
}

/// Process-wide session state, passed by handle into request handlers
pub struct SessionState {
    store: DocumentStore,
    factory: Arc<dyn PipelineFactory>,
    active: RwLock<Option<ActiveDocument>>,
}

impl SessionState {
    /// Create an uninitialized session over a document store
    pub fn new(store: DocumentStore, factory: Arc<dyn PipelineFactory>) -> Self {
        Self {
            store,
            factory,
            active: RwLock::new(None),
        }
    }

    /// The document store backing this session
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Filename of the currently active document, if any
    pub fn active_document(&self) -> Option<String> {
        self.active.read().as_ref().map(|a| a.filename.clone())
    }

    /// Activate a document from the store.
    ///
    /// The fresh pipeline is built before the slot is touched, so a build
    /// failure leaves the previous document and pipeline unchanged. Memory
    /// starts empty by construction on every swap.
    pub async fn activate(&self, filename: &str) -> Result<()> {
        let path = self.store.resolve(filename)?;
        if !path.is_file() {
            return Err(Error::NotFound(filename.to_string()));
        }

        let pipeline = self.factory.build(&path).await?;

        *self.active.write() = Some(ActiveDocument {
            filename: filename.to_string(),
            pipeline,
        });

        tracing::info!("Activated document: {} (memory reset)", filename);
        Ok(())
    }

    /// Validate, persist and activate an uploaded document.
    ///
    /// Rejects non-text extensions before anything is written. If the write
    /// succeeds but activation fails, the file stays on disk, the session is
    /// untouched, and the error surfaces the partial-success condition.
    pub async fn upload_and_activate(&self, filename: &str, data: &[u8]) -> Result<DocumentInfo> {
        if filename.is_empty() {
            return Err(Error::Validation("No file provided".to_string()));
        }
        if !DocumentStore::is_allowed_extension(filename) {
            return Err(Error::Validation(
                "Only .txt and .md files are supported".to_string(),
            ));
        }

        self.store.save(filename, data).await?;
        tracing::info!("Saved uploaded file: {} ({} bytes)", filename, data.len());

        self.activate(filename).await.map_err(|e| {
            tracing::error!("File saved but chain rebuild failed: {}", e);
            Error::Internal(format!("Failed to initialize RAG chain: {}", e))
        })?;

        Ok(DocumentInfo {
            filename: filename.to_string(),
            size: data.len() as u64,
            active: true,
        })
    }

    /// Clear conversational memory on the active pipeline, if any
    pub fn reset_memory(&self) -> ResetOutcome {
        match self.active.read().as_ref() {
            Some(active) => {
                active.pipeline.reset_memory();
                tracing::info!("Conversation memory has been reset");
                ResetOutcome::Cleared
            }
            None => {
                tracing::warn!("Reset requested but no pipeline is active");
                ResetOutcome::NothingToReset
            }
        }
    }

    /// Enumerate store documents, marking the active one
    pub fn list_documents(&self) -> Result<Vec<DocumentInfo>> {
        let active = self.active_document();
        self.store.list(active.as_deref())
    }

    /// Snapshot the active pipeline's memory; empty when uninitialized
    pub fn history(&self) -> MemorySnapshot {
        self.active
            .read()
            .as_ref()
            .map(|a| a.pipeline.memory_snapshot())
            .unwrap_or_default()
    }

    /// Answer a question against the current pipeline through the retry
    /// policy.
    ///
    /// The pipeline reference is captured under the lock and invoked outside
    /// it; a concurrent activation may swap the slot mid-flight, and the
    /// in-flight ask completes against the snapshot it captured.
    pub async fn ask(&self, question: &str, retry: &RetryPolicy) -> Result<AskOutcome> {
        let pipeline = self
            .active
            .read()
            .as_ref()
            .map(|a| Arc::clone(&a.pipeline))
            .ok_or_else(|| {
                Error::Internal("No active document; upload or activate one first".to_string())
            })?;

        retry.invoke(pipeline.as_ref(), question).await
    }
}
