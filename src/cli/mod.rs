//! CLI module for Lese.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Lese - chat with a language model that searches and remembers arXiv papers
///
/// The model can search arXiv by topic, which stores the results locally, and
/// look up any stored paper by its identifier.
/// The name "Lese" comes from the Norwegian word for "read."
#[derive(Parser, Debug)]
#[command(name = "lese")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Ask a single question and exit
    Ask {
        /// The question to ask
        query: String,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Search arXiv for a topic and store the results
    Search {
        /// Topic to search for
        topic: String,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
    },

    /// Show the stored information for a paper
    Lookup {
        /// arXiv identifier, e.g. 2301.01234v2
        paper_id: String,
    },

    /// List stored topics
    Topics,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_with_limit() {
        let cli = Cli::try_parse_from(["lese", "-vv", "search", "graph theory", "-n", "3"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Search { topic, max_results } => {
                assert_eq!(topic, "graph theory");
                assert_eq!(max_results, Some(3));
            }
            other => panic!("Expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["lese", "topics", "--config", "/tmp/lese.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/lese.toml"));
        assert!(matches!(cli.command, Commands::Topics));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
