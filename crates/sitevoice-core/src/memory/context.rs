//! Cross-session context window assembly.
//!
//! Takes a visitor's non-expired turn history and produces the bounded
//! message context injected ahead of the current user message. Truncation
//! is oldest-first: when over budget, the earliest turns drop out.

use sitevoice_types::llm::Message;
use sitevoice_types::turn::ConversationTurn;

/// Bounds on injected context, keeping latency and cost predictable.
#[derive(Debug, Clone, Copy)]
pub struct ContextLimits {
    /// Maximum prior turns injected.
    pub max_turns: usize,
    /// Token-estimate budget across injected turns.
    pub token_budget: u32,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self { max_turns: 10, token_budget: 1_500 }
    }
}

/// The assembled context for one request.
#[derive(Debug, Clone, Default)]
pub struct ContextWindow {
    /// Alternating user/assistant messages from prior turns, oldest first.
    pub messages: Vec<Message>,
    /// How many prior turns made it into the window.
    pub turns_included: usize,
}

impl ContextWindow {
    /// Assemble a window from history already filtered to one visitor and
    /// ordered by `created_at` ascending.
    ///
    /// Walks the history newest-first, admitting turns until either bound
    /// is hit, then restores chronological order. The budget always admits
    /// at least the most recent turn so a single oversized exchange does
    /// not erase the visitor's memory entirely.
    pub fn assemble(history: &[ConversationTurn], limits: ContextLimits) -> Self {
        let mut admitted: Vec<&ConversationTurn> = Vec::new();
        let mut spent: u32 = 0;

        for turn in history.iter().rev() {
            if admitted.len() >= limits.max_turns {
                break;
            }
            if !admitted.is_empty() && spent + turn.token_estimate > limits.token_budget {
                break;
            }
            spent += turn.token_estimate;
            admitted.push(turn);
        }

        admitted.reverse();

        let mut messages = Vec::with_capacity(admitted.len() * 2);
        for turn in &admitted {
            messages.push(Message::user(turn.user_message.clone()));
            messages.push(Message::assistant(turn.assistant_message.clone()));
        }

        Self { messages, turns_included: admitted.len() }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
