//! Tool schemas and dispatch.

use super::{LookupTool, SearchTool, ToolOutput};
use crate::error::{LeseError, Result};
use crate::model::ToolDefinition;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Tools the model may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    SearchPapers,
    ExtractInfo,
}

impl ToolName {
    /// Every tool, in the order advertised to the model.
    pub const ALL: [ToolName; 2] = [ToolName::SearchPapers, ToolName::ExtractInfo];

    /// Wire name of the tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::SearchPapers => "search_papers",
            ToolName::ExtractInfo => "extract_info",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::SearchPapers => {
                "Search for papers on arXiv based on a topic and store their information."
            }
            ToolName::ExtractInfo => {
                "Search for information about a specific paper across all topic directories."
            }
        }
    }

    /// JSON schema of the tool's arguments.
    pub fn input_schema(&self, default_max_results: usize) -> Value {
        match self {
            ToolName::SearchPapers => json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "The topic to search for"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results to retrieve",
                        "default": default_max_results
                    }
                },
                "required": ["topic"]
            }),
            ToolName::ExtractInfo => json!({
                "type": "object",
                "properties": {
                    "paper_id": {
                        "type": "string",
                        "description": "The ID of the paper to look for"
                    }
                },
                "required": ["paper_id"]
            }),
        }
    }

    pub fn definition(&self, default_max_results: usize) -> ToolDefinition {
        ToolDefinition {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(default_max_results),
        }
    }
}

impl FromStr for ToolName {
    type Err = LeseError;

    fn from_str(s: &str) -> Result<Self> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| LeseError::UnknownTool(s.to_string()))
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct SearchPapersArgs {
    topic: String,
    #[serde(default)]
    max_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ExtractInfoArgs {
    paper_id: String,
}

fn parse_args<T: DeserializeOwned>(tool: ToolName, input: &Value) -> Result<T> {
    T::deserialize(input)
        .map_err(|e| LeseError::InvalidInput(format!("Invalid arguments for {}: {}", tool, e)))
}

/// Advertises the tools to the model and runs the ones it picks.
pub struct ToolRegistry {
    search: SearchTool,
    lookup: LookupTool,
    default_max_results: usize,
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(search: SearchTool, lookup: LookupTool, default_max_results: usize) -> Self {
        let definitions = ToolName::ALL
            .iter()
            .map(|tool| tool.definition(default_max_results))
            .collect();
        Self {
            search,
            lookup,
            default_max_results,
            definitions,
        }
    }

    /// Schemas of every registered tool.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Run a tool with JSON arguments.
    pub async fn execute(&self, tool: ToolName, input: &Value) -> Result<ToolOutput> {
        match tool {
            ToolName::SearchPapers => {
                let args: SearchPapersArgs = parse_args(tool, input)?;
                let max_results = args.max_results.unwrap_or(self.default_max_results);
                let ids = self.search.search_papers(&args.topic, max_results).await;
                Ok(ToolOutput::Ids(ids))
            }
            ToolName::ExtractInfo => {
                let args: ExtractInfoArgs = parse_args(tool, input)?;
                Ok(self.lookup.lookup(&args.paper_id))
            }
        }
    }

    /// Run a tool by wire name and render its output as text for the model.
    pub async fn dispatch(&self, name: &str, input: &Value) -> Result<String> {
        let tool: ToolName = name.parse()?;
        info!("Calling tool {} with args {}", tool, input);
        self.execute(tool, input).await?.into_text()
    }
}
