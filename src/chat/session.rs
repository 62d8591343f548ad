//! Chat session with tool calling loop.

use super::Conversation;
use crate::error::{LeseError, Result};
use crate::model::{ContentBlock, ModelService, Turn};
use crate::tools::ToolRegistry;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Default cap on model calls per query.
pub const DEFAULT_MAX_ROUNDS: usize = 25;

/// Progress reported while a query runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// Text produced by the model.
    Text(String),
    /// The model invoked a tool.
    ToolCall { name: String, input: Value },
    /// A tool finished.
    ToolResult {
        name: String,
        output: String,
        is_error: bool,
    },
}

/// Result of a completed query.
#[derive(Debug)]
pub struct QueryOutcome {
    /// Text of the final, tool-free model response.
    pub text: String,
    /// Record of all tool calls made while answering.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model calls used.
    pub rounds: usize,
    /// Full conversation, ending with the final response.
    pub conversation: Conversation,
}

/// Record of a tool call made during a query.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Text returned to the model.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

/// Drives queries through the model and the tool registry.
pub struct ChatSession {
    model: Box<dyn ModelService>,
    registry: ToolRegistry,
    max_rounds: usize,
}

impl ChatSession {
    pub fn new(model: Box<dyn ModelService>, registry: ToolRegistry) -> Self {
        Self {
            model,
            registry,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Set the maximum number of model calls per query.
    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max.max(1);
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.model()
    }

    /// Run one query to a terminal response.
    ///
    /// Every query starts from a fresh conversation. Tool failures are sent
    /// back to the model as error results; model failures end the query.
    pub async fn process_query<F>(&self, query: &str, mut on_event: F) -> Result<QueryOutcome>
    where
        F: FnMut(ChatEvent),
    {
        let mut conversation = Conversation::new(query);
        let mut tool_calls = Vec::new();
        let mut rounds = 0;

        loop {
            if rounds >= self.max_rounds {
                return Err(LeseError::Conversation(format!(
                    "Query exceeded the maximum of {} model rounds",
                    self.max_rounds
                )));
            }
            rounds += 1;
            debug!("Chat round {}, {} turns", rounds, conversation.len());

            let response = self
                .model
                .respond(conversation.turns(), self.registry.definitions())
                .await?;

            let terminal = response.is_terminal();
            let mut results = Vec::new();
            for block in &response.content {
                match block {
                    ContentBlock::Text { text } => on_event(ChatEvent::Text(text.clone())),
                    ContentBlock::ToolUse { id, name, input } => {
                        let (output, is_error) = self.run_tool(name, input, &mut on_event).await;
                        tool_calls.push(ToolCallRecord {
                            name: name.clone(),
                            arguments: input.to_string(),
                            result: output.clone(),
                        });
                        results.push(ContentBlock::ToolResult {
                            tool_use_id: id.clone(),
                            content: output,
                            is_error,
                        });
                    }
                    ContentBlock::ToolResult { .. } => {}
                }
            }

            let text = response.text();
            conversation.push(Turn::assistant(response.content));

            if terminal {
                return Ok(QueryOutcome {
                    text,
                    tool_calls,
                    rounds,
                    conversation,
                });
            }

            conversation.push(Turn::tool_results(results));
        }
    }

    /// Dispatch one tool invocation, reporting it through `on_event`.
    ///
    /// Returns the text for the model and whether it is an error result.
    async fn run_tool<F>(&self, name: &str, input: &Value, on_event: &mut F) -> (String, bool)
    where
        F: FnMut(ChatEvent),
    {
        info!("Calling tool {} with args {}", name, input);
        on_event(ChatEvent::ToolCall {
            name: name.to_string(),
            input: input.clone(),
        });

        let (output, is_error) = match self.registry.dispatch(name, input).await {
            Ok(output) => (output, false),
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                (format!("Error: {}", e), true)
            }
        };

        on_event(ChatEvent::ToolResult {
            name: name.to_string(),
            output: output.clone(),
            is_error,
        });
        (output, is_error)
    }
}
