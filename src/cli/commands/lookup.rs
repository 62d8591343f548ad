//! Lookup command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::PaperStore;
use crate::tools::{LookupTool, ToolOutput};
use anyhow::Result;

/// Show a stored paper.
pub fn run_lookup(paper_id: &str, settings: Settings) -> Result<()> {
    let tool = LookupTool::new(PaperStore::new(settings.papers_dir()));

    match tool.lookup(paper_id) {
        ToolOutput::Record(record) => Output::paper(paper_id, &record),
        other => Output::warning(&other.into_text()?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PaperRecord;

    fn settings_for(dir: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.general.papers_dir = Some(dir.display().to_string());
        settings
    }

    #[test]
    fn test_lookup_found_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let record = PaperRecord {
            title: "Stored".to_string(),
            authors: vec!["A".to_string()],
            summary: "S".to_string(),
            pdf_url: "http://arxiv.org/pdf/2301.00001v1".to_string(),
            published: "2023-01-01".to_string(),
        };
        PaperStore::new(dir.path())
            .merge_and_save("graphs", vec![("2301.00001v1".to_string(), record)])
            .unwrap();

        assert!(run_lookup("2301.00001v1", settings_for(dir.path())).is_ok());
        assert!(run_lookup("9999.99999", settings_for(dir.path())).is_ok());
    }
}
