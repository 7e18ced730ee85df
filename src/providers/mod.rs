//! Provider abstractions for embeddings and answer generation

pub mod embedding;
pub mod llm;
pub mod mistral;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use mistral::MistralClient;
