//! OpenAI chat completions client with sensible defaults.

use super::{ContentBlock, ModelResponse, ModelService, Role, ToolDefinition, Turn};
use crate::config::ModelSettings;
use crate::error::{LeseError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestToolMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolType,
    CreateChatCompletionRequestArgs, FinishReason, FunctionCall, FunctionObject,
};
use async_openai::Client;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Create an OpenAI client with a request timeout.
///
/// `base_url` overrides the API base for proxies or compatible servers.
pub fn create_client(
    api_key: &str,
    base_url: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;
    let mut config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base) = base_url {
        config = config.with_api_base(base);
    }
    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Model service backed by the OpenAI chat completions API.
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Create a client from model settings.
    pub fn new(api_key: String, settings: &ModelSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(
                &api_key,
                settings.base_url.as_deref(),
                Duration::from_secs(settings.timeout_seconds),
            )?,
            model: settings.model_name().to_string(),
            max_tokens: settings.max_tokens,
        })
    }
}

#[async_trait]
impl ModelService for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.model, turns = turns.len()))]
    async fn respond(&self, turns: &[Turn], tools: &[ToolDefinition]) -> Result<ModelResponse> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(to_messages(turns)?)
            .max_completion_tokens(self.max_tokens);
        if !tools.is_empty() {
            builder.tools(to_tools(tools));
        }
        let request = builder.build().map_err(model_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LeseError::ModelService(format!("Chat API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LeseError::ModelService("No response from model".to_string()))?;

        let mut content = Vec::new();
        if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
            content.push(ContentBlock::Text { text });
        }
        for call in choice.message.tool_calls.unwrap_or_default() {
            let input = serde_json::from_str(&call.function.arguments)
                .unwrap_or(Value::String(call.function.arguments));
            content.push(ContentBlock::ToolUse {
                id: call.id,
                name: call.function.name,
                input,
            });
        }

        debug!("Model replied with {} blocks", content.len());
        Ok(ModelResponse {
            content,
            stop_reason: choice.finish_reason.and_then(finish_reason_name),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Wire name of a finish reason, e.g. `tool_calls`.
fn finish_reason_name(reason: FinishReason) -> Option<String> {
    match serde_json::to_value(reason) {
        Ok(Value::String(name)) => Some(name),
        _ => None,
    }
}

fn model_error(e: impl std::fmt::Display) -> LeseError {
    LeseError::ModelService(e.to_string())
}

fn to_tools(tools: &[ToolDefinition]) -> Vec<ChatCompletionTool> {
    tools
        .iter()
        .map(|tool| ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                parameters: Some(tool.input_schema.clone()),
                strict: None,
            },
        })
        .collect()
}

/// Convert conversation turns into chat completion messages.
///
/// Tool results become one tool message per result, in order.
fn to_messages(turns: &[Turn]) -> Result<Vec<ChatCompletionRequestMessage>> {
    let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

    for turn in turns {
        match turn.role {
            Role::Assistant => {
                let mut text = Vec::new();
                let mut calls = Vec::new();
                for block in &turn.content {
                    match block {
                        ContentBlock::Text { text: t } => text.push(t.as_str()),
                        ContentBlock::ToolUse { id, name, input } => {
                            calls.push(ChatCompletionMessageToolCall {
                                id: id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: name.clone(),
                                    arguments: input.to_string(),
                                },
                            })
                        }
                        ContentBlock::ToolResult { .. } => {}
                    }
                }

                let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
                if !text.is_empty() {
                    builder.content(text.join("\n"));
                }
                if !calls.is_empty() {
                    builder.tool_calls(calls);
                }
                messages.push(builder.build().map_err(model_error)?.into());
            }
            Role::User => {
                for block in &turn.content {
                    match block {
                        ContentBlock::Text { text } => messages.push(
                            ChatCompletionRequestUserMessageArgs::default()
                                .content(text.as_str())
                                .build()
                                .map_err(model_error)?
                                .into(),
                        ),
                        ContentBlock::ToolResult {
                            tool_use_id,
                            content,
                            ..
                        } => messages.push(
                            ChatCompletionRequestToolMessageArgs::default()
                                .tool_call_id(tool_use_id.as_str())
                                .content(content.clone())
                                .build()
                                .map_err(model_error)?
                                .into(),
                        ),
                        ContentBlock::ToolUse { .. } => {}
                    }
                }
            }
        }
    }

    Ok(messages)
}
