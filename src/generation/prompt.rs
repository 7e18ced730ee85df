//! Prompt templates for grounded RAG generation

use crate::memory::{MemorySnapshot, Role};
use crate::retrieval::ScoredChunk;

/// Prompt builder for document-grounded questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build numbered context excerpts from retrieved chunks
    pub fn build_context(results: &[ScoredChunk]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}]\n{}\n\n---\n\n",
                i + 1,
                result.content.trim()
            ));
        }

        context
    }

    /// Build the full prompt: grounding rules, conversation so far,
    /// document context, question.
    pub fn build_rag_prompt(question: &str, context: &str, memory: &MemorySnapshot) -> String {
        format!(
            r#"You are a document-grounded assistant.

RULES:
1. Answer ONLY from the document context below.
2. If the answer is not in the context, say "This information is not available in the provided document."
3. Do not use external knowledge or make assumptions beyond what is explicitly stated.
4. Use the conversation so far only to resolve references in follow-up questions.

{conversation}CONTEXT FROM THE DOCUMENT:
{context}
QUESTION: {question}

Answer using only the document content above:"#,
            conversation = Self::format_conversation(memory),
            context = context,
            question = question,
        )
    }

    /// Format the rolling summary and recent turns, empty when no history
    fn format_conversation(memory: &MemorySnapshot) -> String {
        if memory.history.is_empty() && memory.summary.is_empty() {
            return String::new();
        }

        let mut section = String::from("CONVERSATION SO FAR:\n");

        if !memory.summary.is_empty() {
            section.push_str(&format!("Summary of earlier turns:\n{}\n", memory.summary));
        }

        for message in &memory.history {
            let speaker = match message.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            section.push_str(&format!("{}: {}\n", speaker, message.content));
        }

        section.push('\n');
        section
    }
}
