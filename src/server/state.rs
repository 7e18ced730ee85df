//! Application state for the Q&A server

use std::sync::Arc;

use crate::chain::{PipelineFactory, RagChainFactory};
use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::MistralClient;
use crate::retry::RetryPolicy;
use crate::session::SessionState;
use crate::storage::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Active-document session
    session: SessionState,
    /// Retry policy for pipeline invocations
    retry: RetryPolicy,
}

impl AppState {
    /// Create application state wired to the hosted Mistral API.
    ///
    /// Fails with a configuration error when the API credential is missing.
    pub fn new(config: RagConfig) -> Result<Self> {
        config.validate()?;

        let client = Arc::new(MistralClient::new(&config.llm)?);
        tracing::info!(
            "Mistral client initialized (chat: {}, embeddings: {})",
            config.llm.chat_model,
            config.llm.embed_model
        );

        let factory: Arc<dyn PipelineFactory> = Arc::new(RagChainFactory::new(
            &config,
            client.clone(),
            client,
        ));

        Self::with_factory(config, factory)
    }

    /// Create application state with an injected pipeline factory.
    ///
    /// Used by tests to avoid the hosted API; production code goes through
    /// [`AppState::new`].
    pub fn with_factory(config: RagConfig, factory: Arc<dyn PipelineFactory>) -> Result<Self> {
        let store = DocumentStore::new(config.documents.storage_dir.clone())?;
        tracing::info!("Document store at {}", store.root().display());

        let session = SessionState::new(store, factory);
        let retry = RetryPolicy::new(config.llm.max_attempts);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                retry,
            }),
        })
    }

    /// Activate the configured default document when present.
    ///
    /// A missing or unbuildable default is a warning, not a startup failure;
    /// the session simply starts uninitialized.
    pub async fn seed_default_document(&self) {
        let default = self.inner.config.documents.default_document.clone();
        if default.is_empty() {
            return;
        }

        match self.inner.session.activate(&default).await {
            Ok(()) => {
                tracing::info!("Default document '{}' activated at startup", default);
            }
            Err(e) => {
                tracing::warn!(
                    "Default document '{}' not activated ({}); starting without an active document",
                    default,
                    e
                );
            }
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the session state
    pub fn session(&self) -> &SessionState {
        &self.inner.session
    }

    /// Get the retry policy
    pub fn retry(&self) -> &RetryPolicy {
        &self.inner.retry
    }
}
