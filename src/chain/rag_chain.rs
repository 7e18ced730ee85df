//! The retrieval-augmented chain: retrieve, prompt, generate, remember

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::memory::{ConversationMemory, MemorySnapshot};
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::ChunkIndex;

use super::{AskOutcome, Pipeline};

/// Pipeline over a single document: embedded chunks, a hosted LLM, and
/// conversational memory.
pub struct RagChain {
    index: ChunkIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    memory: Mutex<ConversationMemory>,
    top_k: usize,
}

impl RagChain {
    /// Assemble a chain from an already-built chunk index
    pub fn new(
        index: ChunkIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
        max_history_turns: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            llm,
            memory: Mutex::new(ConversationMemory::new(max_history_turns)),
            top_k,
        }
    }
}

#[async_trait]
impl Pipeline for RagChain {
    async fn ask(&self, question: &str) -> Result<AskOutcome> {
        // Snapshot memory up front; the lock is never held across an await
        let memory_before = self.memory.lock().snapshot();
        tracing::debug!(
            messages = memory_before.history.len(),
            "Memory state before processing"
        );

        let query_embedding = self.embedder.embed(question).await?;
        let results = self.index.search(&query_embedding, self.top_k);
        tracing::debug!(chunks = results.len(), "Retrieved context chunks");

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_rag_prompt(question, &context, &memory_before);

        let answer = self.llm.generate_answer(&prompt).await?;

        let messages_after = {
            let mut memory = self.memory.lock();
            memory.record_turn(question, &answer);
            memory.len()
        };
        tracing::debug!(messages = messages_after, "Memory state after processing");

        Ok(AskOutcome { answer })
    }

    fn memory_snapshot(&self) -> MemorySnapshot {
        self.memory.lock().snapshot()
    }

    fn reset_memory(&self) {
        self.memory.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use parking_lot::Mutex as PlMutex;

    /// Embedder that maps known words onto fixed axes
    struct WordEmbedder;

    #[async_trait]
    impl EmbeddingProvider for WordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let text = text.to_lowercase();
            Ok(vec![
                if text.contains("apples") { 1.0 } else { 0.0 },
                if text.contains("oranges") { 1.0 } else { 0.0 },
            ])
        }

        fn name(&self) -> &str {
            "word-test"
        }
    }

    /// LLM that echoes the prompt it was given
    struct EchoLlm {
        prompts: PlMutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmProvider for EchoLlm {
        async fn generate_answer(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            Ok("a grounded answer".to_string())
        }

        fn name(&self) -> &str {
            "echo-test"
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    /// LLM that always fails
    struct FailingLlm;

    #[async_trait]
    impl LlmProvider for FailingLlm {
        async fn generate_answer(&self, _prompt: &str) -> Result<String> {
            Err(Error::Llm("model exploded".to_string()))
        }

        fn name(&self) -> &str {
            "failing-test"
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    fn fruit_chain(llm: Arc<dyn LlmProvider>) -> RagChain {
        let index = ChunkIndex::new(
            vec![
                "Apples are red.".to_string(),
                "Oranges are orange.".to_string(),
            ],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        );
        RagChain::new(index, Arc::new(WordEmbedder), llm, 1, 4)
    }

    #[tokio::test]
    async fn test_ask_retrieves_relevant_chunk_and_records_turn() {
        let llm = Arc::new(EchoLlm {
            prompts: PlMutex::new(Vec::new()),
        });
        let chain = fruit_chain(llm.clone());

        let outcome = chain.ask("Tell me about apples").await.unwrap();
        assert_eq!(outcome.answer, "a grounded answer");

        let prompts = llm.prompts.lock();
        assert!(prompts[0].contains("Apples are red."));
        assert!(!prompts[0].contains("Oranges are orange."));

        let snapshot = chain.memory_snapshot();
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[0].content, "Tell me about apples");
        assert_eq!(snapshot.history[1].content, "a grounded answer");
    }

    #[tokio::test]
    async fn test_follow_up_prompt_carries_prior_turns() {
        let llm = Arc::new(EchoLlm {
            prompts: PlMutex::new(Vec::new()),
        });
        let chain = fruit_chain(llm.clone());

        chain.ask("Tell me about apples").await.unwrap();
        chain.ask("And oranges?").await.unwrap();

        let prompts = llm.prompts.lock();
        assert!(prompts[1].contains("CONVERSATION SO FAR"));
        assert!(prompts[1].contains("User: Tell me about apples"));
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_memory_untouched() {
        let chain = fruit_chain(Arc::new(FailingLlm));

        let err = chain.ask("Tell me about apples").await.unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
        assert!(chain.memory_snapshot().history.is_empty());
    }

    #[tokio::test]
    async fn test_reset_memory_clears_everything() {
        let llm = Arc::new(EchoLlm {
            prompts: PlMutex::new(Vec::new()),
        });
        let chain = fruit_chain(llm);

        chain.ask("Tell me about apples").await.unwrap();
        assert!(!chain.memory_snapshot().history.is_empty());

        chain.reset_memory();
        let snapshot = chain.memory_snapshot();
        assert!(snapshot.history.is_empty());
        assert!(snapshot.summary.is_empty());
    }
}
