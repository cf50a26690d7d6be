use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lifelog")]
#[command(version, about = "A personal problem journal with an optional web dashboard")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (default: $LIFELOG_DIR or ~/.lifelog)
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log a new problem
    #[command(visible_alias = "p")]
    Problem {
        /// The problem text
        #[arg(required = true, value_name = "TEXT")]
        text: Vec<String>,

        /// Skip AI analysis even when a provider is configured
        #[arg(long)]
        no_ai: bool,
    },

    /// List all problems, newest first
    List,

    /// Show problems logged today
    Today,

    /// Search problems by text
    #[command(visible_alias = "s")]
    Search {
        /// Search text (case-insensitive substring)
        #[arg(required = true, value_name = "TEXT")]
        query: Vec<String>,
    },

    /// Delete a problem (and everything nested under it)
    Delete {
        /// Text to match the problem by
        #[arg(value_name = "TEXT")]
        query: String,

        /// Delete without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// AI review of logged problems
    Review {
        /// Review every problem ever logged
        #[arg(long, conflicts_with_all = ["last", "from", "to", "topic"])]
        all: bool,

        /// Review only the N most recent problems
        #[arg(long, value_name = "N")]
        last: Option<u32>,

        /// Range start (YYYY-MM-DD), requires --to
        #[arg(long, value_name = "DATE", requires = "to")]
        from: Option<String>,

        /// Range end (YYYY-MM-DD), requires --from
        #[arg(long, value_name = "DATE", requires = "from")]
        to: Option<String>,

        /// Only problems mentioning this topic
        #[arg(long, value_name = "TEXT")]
        topic: Option<String>,
    },

    /// AI summary for a period
    Summary {
        /// Period to summarize
        #[arg(value_name = "PERIOD", default_value = "daily",
              value_parser = ["daily", "weekly", "monthly"])]
        period: String,
    },

    /// Manage configuration
    Config(ConfigCommand),

    /// Run the local web dashboard API
    Serve {
        /// Port to listen on
        #[arg(long, short = 'p', default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration (API key masked)
    Show,

    /// Set a configuration value
    Set {
        /// One of: provider, apiKey, model, baseUrl, enabled, maxTokens
        key: String,
        value: String,
    },

    /// Print the configuration and storage file paths
    Path,
}
