//! Conversational memory: recent turns plus a rolling summary

use serde::{Deserialize, Serialize};

/// Role of a recorded message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A question from the user
    User,
    /// An answer from the model
    Assistant,
}

/// A single recorded message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Stable snapshot of the memory state, exposed by the `/history` endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Ordered message sequence, oldest first
    pub history: Vec<ChatMessage>,
    /// Rolling summary of turns that fell out of the window
    pub summary: String,
}

/// Ordered question/answer turns with a rolling summary.
///
/// Owned exclusively by the active pipeline; cleared whenever the active
/// document changes or on an explicit reset.
#[derive(Debug)]
pub struct ConversationMemory {
    messages: Vec<ChatMessage>,
    summary: String,
    max_turns: usize,
}

impl ConversationMemory {
    /// Create an empty memory keeping up to `max_turns` turns verbatim
    pub fn new(max_turns: usize) -> Self {
        Self {
            messages: Vec::new(),
            summary: String::new(),
            max_turns: max_turns.max(1),
        }
    }

    /// Record a completed question/answer turn.
    ///
    /// When the buffer exceeds the window, the oldest turn is folded into
    /// the rolling summary so follow-up questions keep long-range context.
    pub fn record_turn(&mut self, question: &str, answer: &str) {
        self.messages.push(ChatMessage {
            role: Role::User,
            content: question.to_string(),
        });
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: answer.to_string(),
        });

        while self.messages.len() > self.max_turns * 2 {
            let folded: Vec<ChatMessage> = self.messages.drain(..2).collect();
            for msg in folded {
                let prefix = match msg.role {
                    Role::User => "Q",
                    Role::Assistant => "A",
                };
                self.summary.push_str(&format!("{}: {}\n", prefix, msg.content));
            }
        }
    }

    /// Clear all messages and the rolling summary
    pub fn clear(&mut self) {
        self.messages.clear();
        self.summary.clear();
    }

    /// Number of recorded messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no messages have been recorded
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.summary.is_empty()
    }

    /// Snapshot the current state for the debugging surface
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            history: self.messages.clone(),
            summary: self.summary.clone(),
        }
    }
}
