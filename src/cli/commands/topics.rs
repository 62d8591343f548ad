//! Topics command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::PaperStore;
use anyhow::Result;

/// List stored topic partitions.
pub fn run_topics(settings: Settings) -> Result<()> {
    let store = PaperStore::new(settings.papers_dir());
    let topics = store.topics();

    if topics.is_empty() {
        Output::info("No topics stored yet. Use 'lese search <topic>' to add papers.");
        return Ok(());
    }

    Output::header(&format!("Stored Topics ({})", topics.len()));
    println!();
    for topic in &topics {
        Output::list_item(&format!("{} ({} papers)", topic.name, topic.paper_count));
    }

    let total: usize = topics.iter().map(|t| t.paper_count).sum();
    println!();
    Output::kv("Total papers", &total.to_string());
    Output::kv("Store", &store.root().display().to_string());

    Ok(())
}
