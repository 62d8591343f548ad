//! Paper lookup tool.

use super::ToolOutput;
use crate::store::PaperStore;
use tracing::debug;

/// Looks up stored paper metadata by identifier.
#[derive(Debug, Clone)]
pub struct LookupTool {
    store: PaperStore,
}

impl LookupTool {
    pub fn new(store: PaperStore) -> Self {
        Self { store }
    }

    /// Find a paper in any topic partition.
    ///
    /// A missing paper is a normal outcome and yields a message, not an error.
    pub fn lookup(&self, paper_id: &str) -> ToolOutput {
        match self.store.find(paper_id) {
            Some(record) => ToolOutput::Record(record),
            None => {
                debug!("Paper {} not found in {}", paper_id, self.store.root().display());
                ToolOutput::Text(not_found_message(paper_id))
            }
        }
    }
}

fn not_found_message(paper_id: &str) -> String {
    format!("There's no saved information related to paper {}.", paper_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PaperRecord;

    #[test]
    fn test_lookup_round_trips_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());
        let record = PaperRecord {
            title: "Quantum Walks on Graphs".to_string(),
            authors: vec!["A. Ambainis".to_string(), "J. Kempe".to_string()],
            summary: "We define quantum walks \"on\" graphs.\nSecond line.".to_string(),
            pdf_url: "http://arxiv.org/pdf/quant-ph/0012090v2".to_string(),
            published: "2000-12-21".to_string(),
        };
        store
            .merge_and_save("quantum", vec![("quant-ph/0012090v2".to_string(), record.clone())])
            .unwrap();

        let tool = LookupTool::new(store);
        let text = tool.lookup("quant-ph/0012090v2").into_text().unwrap();
        let back: PaperRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_lookup_missing_paper_is_a_message() {
        let dir = tempfile::tempdir().unwrap();
        let tool = LookupTool::new(PaperStore::new(dir.path()));
        assert_eq!(
            tool.lookup("9999.99999"),
            ToolOutput::Text("There's no saved information related to paper 9999.99999.".to_string())
        );
    }
}
