//! Configuration settings for Lese.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub search: SearchSettings,
    pub chat: ChatSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Root directory of the paper store. Defaults to `<data_dir>/papers`.
    pub papers_dir: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.lese".to_string(),
            papers_dir: None,
        }
    }
}

/// Model service provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Anthropic Messages API (default).
    #[default]
    Anthropic,
    /// OpenAI Chat Completions API.
    OpenAi,
}

impl ModelProvider {
    /// Environment variable holding the API key for this provider.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ModelProvider::Anthropic => "ANTHROPIC_API_KEY",
            ModelProvider::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            ModelProvider::Anthropic => "claude-3-7-sonnet-20250219",
            ModelProvider::OpenAi => "gpt-4o-mini",
        }
    }
}

impl std::str::FromStr for ModelProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ModelProvider::Anthropic),
            "openai" => Ok(ModelProvider::OpenAi),
            _ => Err(format!("Unknown model provider: {}", s)),
        }
    }
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelProvider::Anthropic => write!(f, "anthropic"),
            ModelProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Model service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Which provider to talk to.
    pub provider: ModelProvider,
    /// Model identifier used for every call. Defaults per provider.
    pub model: Option<String>,
    /// Maximum response size in tokens for every call.
    pub max_tokens: u32,
    /// Override for the provider base URL (proxies, testing).
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: ModelProvider::Anthropic,
            model: None,
            max_tokens: 2024,
            base_url: None,
            timeout_seconds: 300,
        }
    }
}

/// Paper search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// arXiv API query endpoint.
    pub arxiv_url: String,
    /// Results requested when the model does not say.
    pub default_max_results: usize,
    /// Ceiling on results per search. Values above 50 are capped at 50.
    pub max_results_ceiling: usize,
    /// Total attempts against the index before giving up.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay_seconds: u64,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            arxiv_url: "https://export.arxiv.org/api/query".to_string(),
            default_max_results: 5,
            max_results_ceiling: 50,
            max_attempts: 3,
            base_delay_seconds: 2,
            timeout_seconds: 30,
        }
    }
}

/// Conversation loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Maximum model calls per query before the loop gives up.
    pub max_rounds: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self { max_rounds: 25 }
    }
}

impl ModelSettings {
    /// Configured model, or the provider's default.
    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lese")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded paper store root.
    pub fn papers_dir(&self) -> PathBuf {
        match &self.general.papers_dir {
            Some(dir) => Self::expand_path(dir),
            None => self.data_dir().join("papers"),
        }
    }
}
