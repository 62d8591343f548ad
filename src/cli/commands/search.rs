//! Search command implementation.

use super::search_tool;
use crate::cli::Output;
use crate::config::Settings;
use crate::store::{sanitize_topic, PaperStore};
use anyhow::Result;

/// Run the search tool directly.
pub async fn run_search(topic: &str, max_results: Option<usize>, settings: Settings) -> Result<()> {
    let tool = search_tool(&settings)?;
    let max_results = max_results.unwrap_or(settings.search.default_max_results);

    let spinner = Output::spinner("Searching arXiv...");
    let result = tool.search(topic, max_results).await;
    spinner.finish_and_clear();

    match result {
        Ok(ids) if ids.is_empty() => {
            Output::warning("No papers found for that topic.");
        }
        Ok(ids) => {
            Output::success(&format!("Stored {} papers", ids.len()));
            let partition = PaperStore::new(settings.papers_dir()).load(topic);
            for id in &ids {
                match partition.get(id) {
                    Some(record) => Output::list_item(&format!("{} {}", id, record.title)),
                    None => Output::list_item(id),
                }
            }
            println!();
            Output::kv("Topic", &sanitize_topic(topic));
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
