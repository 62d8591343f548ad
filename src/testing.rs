//! Queue-based fakes for unit tests.
//!
//! [`FakeIndex`] and [`ScriptedModel`] stand in for the remote services so
//! tests control exactly what each call returns and can inspect what was
//! sent.

use crate::error::{LeseError, Result};
use crate::index::{IndexEntry, PaperIndex};
use crate::model::{ContentBlock, ModelResponse, ModelService, ToolDefinition, Turn};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Build a complete index entry for an arXiv id.
pub fn sample_entry(id: &str, title: &str) -> IndexEntry {
    IndexEntry {
        id_url: Some(format!("http://arxiv.org/abs/{}", id)),
        title: Some(title.to_string()),
        authors: vec!["Jane Doe".to_string(), "John Roe".to_string()],
        summary: Some(format!("Abstract of {}.", title)),
        pdf_url: Some(format!("http://arxiv.org/pdf/{}", id)),
        published: Some("2023-05-11T17:59:59Z".to_string()),
    }
}

/// Index that replays queued results and records each request.
#[derive(Default)]
pub struct FakeIndex {
    results: Mutex<VecDeque<Result<Vec<IndexEntry>>>>,
    requests: Mutex<Vec<(String, usize)>>,
}

impl FakeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(self, entries: Vec<IndexEntry>) -> Self {
        self.results.lock().unwrap().push_back(Ok(entries));
        self
    }

    pub fn queue_failure(self, message: &str) -> Self {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(LeseError::IndexResponse(message.to_string())));
        self
    }

    /// `(query, max_results)` of every request, in order.
    pub fn requests(&self) -> Vec<(String, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaperIndex for FakeIndex {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<IndexEntry>> {
        self.requests
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Model that replays queued responses and records each conversation it saw.
#[derive(Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<ModelResponse>>>,
    calls: Mutex<Vec<Vec<Turn>>>,
    repeat_last: Option<ModelResponse>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model that answers every call with the same response.
    pub fn always(response: ModelResponse) -> Self {
        Self {
            repeat_last: Some(response),
            ..Self::default()
        }
    }

    pub fn queue(self, content: Vec<ContentBlock>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(ModelResponse {
            content,
            stop_reason: None,
        }));
        self
    }

    pub fn queue_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(LeseError::ModelService(message.to_string())));
        self
    }

    /// Conversations sent on each call, in order.
    pub fn calls(&self) -> Vec<Vec<Turn>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelService for ScriptedModel {
    async fn respond(&self, turns: &[Turn], _tools: &[ToolDefinition]) -> Result<ModelResponse> {
        self.calls.lock().unwrap().push(turns.to_vec());
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => self
                .repeat_last
                .clone()
                .ok_or_else(|| LeseError::ModelService("script exhausted".to_string())),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

#[async_trait]
impl<M: ModelService> ModelService for Arc<M> {
    async fn respond(&self, turns: &[Turn], tools: &[ToolDefinition]) -> Result<ModelResponse> {
        self.as_ref().respond(turns, tools).await
    }

    fn model(&self) -> &str {
        self.as_ref().model()
    }
}

/// Shorthand for a tool invocation block.
pub fn tool_use(id: &str, name: &str, input: Value) -> ContentBlock {
    ContentBlock::ToolUse {
        id: id.to_string(),
        name: name.to_string(),
        input,
    }
}
