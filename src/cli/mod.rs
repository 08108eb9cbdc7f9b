//! CLI module for Licita
//!
//! Provides command-line interface parsing for the licita-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod ask;
pub mod init;
pub mod output;

use crate::utils::toml_config::SearchBackend;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Licita - Analisador de Licitações
///
/// Answers questions about Lei 14.133/2021 and Decreto 1.525/2022 by searching
/// official sources, summarizing them and writing a cited analysis.
#[derive(Parser, Debug)]
#[command(
    name = "licita-server",
    version,
    about = "Licita - Analisador de Licitações (Lei 14.133/2021)",
    long_about = "Answers procurement questions with LLM-generated search queries,\n\
                  concurrent searches over official domains and a cited synthesis.\n\n\
                  Run without arguments to start the HTTP server, or use 'ask' for the console.",
    after_help = "EXAMPLES:\n    \
                  licita-server init                  # Scaffold licita.toml and .env.example\n    \
                  licita-server                       # Start the server (requires licita.toml)\n    \
                  licita-server ask \"Quando usar pregão?\"\n    \
                  licita-server ask                   # Interactive console\n    \
                  licita-server config --validate     # Check licita.toml"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "licita.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Analyze a question in the terminal
    ///
    /// Without a question, reads questions interactively until an empty line
    /// or 'sair'.
    Ask {
        /// The question to analyze
        question: Option<String>,

        /// Hide the model's thinking process
        #[arg(long)]
        no_thinking: bool,
    },

    /// List the example questions
    Examples,

    /// Initialize a new Licita deployment with configuration files
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Search backend to configure
        #[arg(long, value_enum, default_value = "tavily")]
        search: SearchBackend,

        /// Host address for the server
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "8000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
