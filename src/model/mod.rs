//! Model service abstraction for Lese.
//!
//! Conversation turns are kept in the Anthropic Messages shape (content
//! blocks of text, tool use and tool result); other providers convert at
//! their boundary.

mod anthropic;
mod openai;

pub use anthropic::AnthropicClient;
pub use openai::{create_client, OpenAiClient};

use crate::config::{ModelProvider, ModelSettings};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Speaker of a turn on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A content item within a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text { text: String },
    /// A tool invocation requested by the model.
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    /// The result of a tool invocation, sent back to the model.
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }
}

/// What a turn carries, independent of its wire role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    User,
    Assistant,
    ToolResult,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Turn {
    /// A user turn holding a single text block.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// An assistant turn.
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// A turn carrying tool results. Sent with the user role.
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: results,
        }
    }

    pub fn kind(&self) -> TurnKind {
        match self.role {
            Role::Assistant => TurnKind::Assistant,
            Role::User
                if !self.content.is_empty()
                    && self
                        .content
                        .iter()
                        .all(|b| matches!(b, ContentBlock::ToolResult { .. })) =>
            {
                TurnKind::ToolResult
            }
            Role::User => TurnKind::User,
        }
    }

    /// Ids of the tool invocations in this turn, in order.
    pub fn tool_use_ids(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Ids answered by the tool results in this turn, in order.
    pub fn tool_result_ids(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolResult { tool_use_id, .. } => Some(tool_use_id.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Tool schema advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A model reply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
}

impl ModelResponse {
    /// Whether the response ends the query (no tool invocations).
    pub fn is_terminal(&self) -> bool {
        !self
            .content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }

    /// All text blocks joined with newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Trait for model service implementations.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Send the conversation and tool schemas, returning the model's reply.
    async fn respond(&self, turns: &[Turn], tools: &[ToolDefinition]) -> Result<ModelResponse>;

    /// Model identifier used for every call.
    fn model(&self) -> &str;
}

/// Build the configured model service.
///
/// `api_key` is read from the environment once by the caller.
pub fn create_service(settings: &ModelSettings, api_key: String) -> Result<Box<dyn ModelService>> {
    Ok(match settings.provider {
        ModelProvider::Anthropic => Box::new(AnthropicClient::new(api_key, settings)?),
        ModelProvider::OpenAi => Box::new(OpenAiClient::new(api_key, settings)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_block_wire_format() {
        let blocks = vec![
            ContentBlock::text("hi"),
            ContentBlock::ToolUse {
                id: "toolu_1".to_string(),
                name: "search_papers".to_string(),
                input: json!({"topic": "graphs"}),
            },
            ContentBlock::ToolResult {
                tool_use_id: "toolu_1".to_string(),
                content: "2301.00001v1".to_string(),
                is_error: false,
            },
        ];

        assert_eq!(
            serde_json::to_value(&blocks).unwrap(),
            json!([
                {"type": "text", "text": "hi"},
                {"type": "tool_use", "id": "toolu_1", "name": "search_papers", "input": {"topic": "graphs"}},
                {"type": "tool_result", "tool_use_id": "toolu_1", "content": "2301.00001v1"}
            ])
        );
    }

    #[test]
    fn test_turn_kinds() {
        assert_eq!(Turn::user("hello").kind(), TurnKind::User);
        assert_eq!(Turn::assistant(vec![]).kind(), TurnKind::Assistant);
        let results = Turn::tool_results(vec![ContentBlock::ToolResult {
            tool_use_id: "a".to_string(),
            content: "ok".to_string(),
            is_error: false,
        }]);
        assert_eq!(results.kind(), TurnKind::ToolResult);
        assert_eq!(results.tool_result_ids(), vec!["a"]);
        assert_eq!(serde_json::to_value(&results).unwrap()["role"], "user");
    }

    #[test]
    fn test_response_terminal() {
        let text_only = ModelResponse {
            content: vec![ContentBlock::text("a"), ContentBlock::text("b")],
            stop_reason: Some("end_turn".to_string()),
        };
        assert!(text_only.is_terminal());
        assert_eq!(text_only.text(), "a\nb");

        let with_tool = ModelResponse {
            content: vec![ContentBlock::ToolUse {
                id: "x".to_string(),
                name: "extract_info".to_string(),
                input: json!({}),
            }],
            stop_reason: Some("tool_use".to_string()),
        };
        assert!(!with_tool.is_terminal());
    }
}
