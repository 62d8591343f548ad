//! Local tools the model can invoke.
//!
//! `search_papers` queries the literature index and persists results;
//! `extract_info` reads a stored paper back. [`ToolRegistry`] advertises
//! both to the model and dispatches invocations to them.

mod lookup;
mod registry;
mod search;

pub use lookup::LookupTool;
pub use registry::{ToolName, ToolRegistry};
pub use search::SearchTool;

use crate::error::Result;
use crate::store::PaperRecord;

/// Text sent to the model when a tool produced nothing.
pub const NO_RESULTS_MESSAGE: &str = "The operation completed but didn't return any results.";

/// Value returned by a tool, before it is rendered for the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Ids(Vec<String>),
    Record(PaperRecord),
    Text(String),
}

impl ToolOutput {
    /// Render the output as the text handed back to the model.
    pub fn into_text(self) -> Result<String> {
        Ok(match self {
            ToolOutput::Ids(ids) if ids.is_empty() => NO_RESULTS_MESSAGE.to_string(),
            ToolOutput::Ids(ids) => ids.join(", "),
            ToolOutput::Record(record) => serde_json::to_string_pretty(&record)?,
            ToolOutput::Text(text) if text.is_empty() => NO_RESULTS_MESSAGE.to_string(),
            ToolOutput::Text(text) => text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_rendering() {
        assert_eq!(ToolOutput::Ids(vec![]).into_text().unwrap(), NO_RESULTS_MESSAGE);
        assert_eq!(ToolOutput::Text(String::new()).into_text().unwrap(), NO_RESULTS_MESSAGE);
        assert_eq!(
            ToolOutput::Ids(vec!["a".to_string(), "b".to_string()]).into_text().unwrap(),
            "a, b"
        );
        assert_eq!(ToolOutput::Text("plain".to_string()).into_text().unwrap(), "plain");
    }

    #[test]
    fn test_record_renders_as_pretty_json() {
        let record = PaperRecord {
            title: "T".to_string(),
            authors: vec!["A".to_string()],
            summary: "S".to_string(),
            pdf_url: "http://arxiv.org/pdf/1".to_string(),
            published: "2020-01-02".to_string(),
        };
        let text = ToolOutput::Record(record.clone()).into_text().unwrap();
        assert!(text.contains("\n  \"title\": \"T\""));
        let back: PaperRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }
}
