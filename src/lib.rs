//! Lese - chat with a language model that searches and remembers arXiv papers
//!
//! The name "Lese" comes from the Norwegian word for "read."
//!
//! # Overview
//!
//! Lese gives a language model two tools:
//! - `search_papers` searches arXiv by topic and stores the results locally
//! - `extract_info` returns the stored metadata for a paper identifier
//!
//! A [`chat::ChatSession`] runs each user query through as many rounds of
//! model response and tool execution as the model asks for.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `store` - Per-topic paper store on disk
//! - `index` - Literature index abstraction and the arXiv client
//! - `retry` - Exponential backoff for flaky remote calls
//! - `tools` - Search and lookup tools plus the tool registry
//! - `model` - Model service abstraction (Anthropic, OpenAI)
//! - `chat` - The tool-augmented conversation loop
//!
//! # Example
//!
//! ```rust,no_run
//! use lese::config::Settings;
//! use lese::index::ArxivClient;
//! use lese::store::PaperStore;
//! use lese::tools::SearchTool;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let index = Arc::new(ArxivClient::from_settings(&settings.search)?);
//!     let store = PaperStore::new(settings.papers_dir());
//!     let search = SearchTool::from_settings(index, store, &settings.search);
//!
//!     let ids = search.search_papers("graph theory", 3).await;
//!     println!("Stored {} papers", ids.len());
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod retry;
pub mod store;
pub mod tools;

#[cfg(test)]
mod testing;

pub use error::{LeseError, Result};
