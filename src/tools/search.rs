//! Paper search tool: query the index, persist results, return identifiers.

use crate::config::SearchSettings;
use crate::error::{LeseError, Result};
use crate::index::PaperIndex;
use crate::retry::RetryPolicy;
use crate::store::PaperStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Hard ceiling on results per search. Configuration can lower it, never raise it.
pub const MAX_RESULTS_CEILING: usize = 50;

/// Searches the literature index and writes results through the paper store.
pub struct SearchTool {
    index: Arc<dyn PaperIndex>,
    store: PaperStore,
    retry: RetryPolicy,
    max_results_ceiling: usize,
}

impl SearchTool {
    /// Create a search tool with the default retry policy and ceiling.
    pub fn new(index: Arc<dyn PaperIndex>, store: PaperStore) -> Self {
        Self {
            index,
            store,
            retry: RetryPolicy::default(),
            max_results_ceiling: MAX_RESULTS_CEILING,
        }
    }

    /// Create a search tool configured from settings.
    pub fn from_settings(
        index: Arc<dyn PaperIndex>,
        store: PaperStore,
        settings: &SearchSettings,
    ) -> Self {
        Self::new(index, store)
            .with_retry(RetryPolicy {
                max_attempts: settings.max_attempts.max(1),
                base_delay: Duration::from_secs(settings.base_delay_seconds),
            })
            .with_max_results_ceiling(settings.max_results_ceiling)
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the maximum number of results per search, capped at [`MAX_RESULTS_CEILING`].
    pub fn with_max_results_ceiling(mut self, ceiling: usize) -> Self {
        self.max_results_ceiling = ceiling.min(MAX_RESULTS_CEILING);
        self
    }

    /// Search for papers on a topic and store their metadata.
    ///
    /// Returns the identifiers of every paper that was stored. Papers whose
    /// metadata cannot be extracted are skipped.
    #[instrument(skip(self))]
    pub async fn search(&self, topic: &str, max_results: usize) -> Result<Vec<String>> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(LeseError::InvalidInput("Topic cannot be empty".to_string()));
        }
        let max_results = max_results.min(self.max_results_ceiling);

        let entries = self
            .retry
            .run("arXiv search", |_| self.index.search(topic, max_results))
            .await
            .map_err(|e| LeseError::SearchUnavailable {
                attempts: e.attempts,
                last_error: e.last_error.to_string(),
            })?;

        if entries.is_empty() {
            info!("No papers found for '{}'", topic);
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        let mut records = Vec::new();
        for entry in entries.into_iter().take(max_results) {
            let label = entry.short_id().unwrap_or_else(|| "<unknown>".to_string());
            match entry.normalize() {
                Ok((id, record)) => {
                    ids.push(id.clone());
                    records.push((id, record));
                }
                Err(e) => warn!("Error processing paper {}: {}", label, e),
            }
        }

        if records.is_empty() {
            return Ok(ids);
        }

        let path = self.store.merge_and_save(topic, records)?;
        info!("Results are saved in: {}", path.display());
        Ok(ids)
    }

    /// Tool entry point: like [`search`](Self::search), but failures are
    /// logged and reported as an empty list.
    pub async fn search_papers(&self, topic: &str, max_results: usize) -> Vec<String> {
        match self.search(topic, max_results).await {
            Ok(ids) => ids,
            Err(e) => {
                error!("Error searching papers for topic '{}': {}", topic, e);
                Vec::new()
            }
        }
    }
}
