//! Error types for Lese.

use thiserror::Error;

/// Library-level error type for Lese operations.
#[derive(Error, Debug)]
pub enum LeseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Paper search unavailable after {attempts} attempt(s): {last_error}")]
    SearchUnavailable { attempts: u32, last_error: String },

    #[error("Unexpected index response: {0}")]
    IndexResponse(String),

    #[error("Paper store error: {0}")]
    Persistence(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Model service error: {0}")]
    ModelService(String),

    #[error("Conversation error: {0}")]
    Conversation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Lese operations.
pub type Result<T> = std::result::Result<T, LeseError>;
