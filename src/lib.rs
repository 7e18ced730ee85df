//! docchat-rag: document-grounded Q&A server with conversational memory
//!
//! A small web backend: upload or select a text document, ask questions, and
//! get answers synthesized from a retrieval step over that document plus a
//! hosted LLM call. Rate-limited upstream calls are retried with bounded
//! exponential backoff; the active document and its conversational memory are
//! swapped and reset as a unit.

pub mod chain;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod memory;
pub mod providers;
pub mod retrieval;
pub mod retry;
pub mod server;
pub mod session;
pub mod storage;
pub mod types;

pub use chain::{AskOutcome, Pipeline, PipelineFactory, RagChainFactory};
pub use config::RagConfig;
pub use error::{Error, Result};
pub use memory::{ChatMessage, MemorySnapshot, Role};
pub use retry::{RetryPolicy, Sleeper};
pub use session::{ResetOutcome, SessionState};
pub use types::{AskRequest, AskResponse, DocumentInfo, StatusResponse};
