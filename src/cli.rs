//! CLI definitions for ReplyKit.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ReplyKit CLI.
#[derive(Parser)]
#[command(name = "replykit")]
#[command(about = "AI reply assistant for forum comment fields")]
#[command(version)]
pub(crate) struct Cli {
    /// Settings file path (default: <config dir>/replykit/settings.toml)
    #[arg(short, long, global = true, env = "REPLYKIT_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate a reply for a field of a saved page
    Reply {
        /// HTML file of the page
        #[arg(long)]
        page: PathBuf,

        /// URL the page was saved from (selects the site profile)
        #[arg(long)]
        url: Option<String>,

        /// Index of the field, as listed by `scan`
        #[arg(long, default_value_t = 0)]
        field: usize,

        /// Reply tone (friendly, professional, humorous, informative, supportive)
        #[arg(long)]
        tone: Option<String>,

        /// Use this context instead of the extracted one
        #[arg(long)]
        context: Option<String>,

        /// Insert the reply into the field and print the field content
        #[arg(long)]
        insert: bool,
    },

    /// List the editable fields of a saved page with their context
    Scan {
        /// HTML file of the page
        #[arg(long)]
        page: PathBuf,

        /// URL the page was saved from
        #[arg(long)]
        url: Option<String>,
    },

    /// Settings management commands
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum SettingsAction {
    /// Print the current settings (API key masked)
    Show,

    /// Update one or more settings
    Set {
        /// API key of the selected provider
        #[arg(long)]
        api_key: Option<String>,

        /// Provider (openai, anthropic, gemini, groq)
        #[arg(long)]
        provider: Option<String>,

        /// Prompt and message language (fr, en, es, de)
        #[arg(long)]
        language: Option<String>,

        /// Default tone
        #[arg(long)]
        tone: Option<String>,

        /// Save a new API key without checking it against the provider
        #[arg(long)]
        no_verify: bool,
    },

    /// Print where to get an API key
    KeyUrl {
        /// Provider (default: the configured one)
        provider: Option<String>,
    },
}
