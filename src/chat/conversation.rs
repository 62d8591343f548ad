//! Conversation state for a single query.

use crate::model::{Turn, TurnKind};

/// Ordered turns of one query's conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Start a conversation with the user's query.
    pub fn new(query: &str) -> Self {
        Self {
            turns: vec![Turn::user(query)],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether every assistant turn with tool invocations is answered by the
    /// next turn, one result per invocation id in the same order.
    pub fn tool_results_paired(&self) -> bool {
        self.turns.iter().enumerate().all(|(i, turn)| {
            let uses = turn.tool_use_ids();
            if turn.kind() != TurnKind::Assistant || uses.is_empty() {
                return true;
            }
            match self.turns.get(i + 1) {
                Some(next) => next.kind() == TurnKind::ToolResult && next.tool_result_ids() == uses,
                None => false,
            }
        })
    }
}
