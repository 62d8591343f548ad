//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod lookup;
mod search;
mod topics;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use lookup::run_lookup;
pub use search::run_search;
pub use topics::run_topics;

use crate::chat::ChatSession;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::index::ArxivClient;
use crate::model::create_service;
use crate::store::PaperStore;
use crate::tools::{LookupTool, SearchTool, ToolRegistry};
use anyhow::Result;
use std::sync::Arc;

/// Build the search tool against arXiv and the configured paper store.
fn search_tool(settings: &Settings) -> Result<SearchTool> {
    let index = Arc::new(ArxivClient::from_settings(&settings.search)?);
    let store = PaperStore::new(settings.papers_dir());
    Ok(SearchTool::from_settings(index, store, &settings.search))
}

/// Build a chat session from settings, checking credentials first.
fn chat_session(model: Option<String>, mut settings: Settings) -> Result<ChatSession> {
    let api_key = match preflight::api_key(settings.model.provider) {
        Ok(key) => key,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    if let Some(model) = model {
        settings.model.model = Some(model);
    }

    let service = create_service(&settings.model, api_key)?;
    let registry = ToolRegistry::new(
        search_tool(&settings)?,
        LookupTool::new(PaperStore::new(settings.papers_dir())),
        settings.search.default_max_results,
    );

    Ok(ChatSession::new(service, registry).with_max_rounds(settings.chat.max_rounds))
}
