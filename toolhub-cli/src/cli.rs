//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toolhub_plugin::Category;

#[derive(Parser)]
#[command(name = "toolhub", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Locale for tool text, e.g. `de-CH`
    #[arg(long, value_name = "TAG", global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available tools, sorted by name
    List {
        /// Only tools in this category
        #[arg(long, value_name = "CATEGORY")]
        category: Option<Category>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a tool's toolbar and content
    Show {
        /// Tool id
        id: String,
    },

    /// Show the startup report
    Status,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the default configuration as YAML
    Sample,
}
