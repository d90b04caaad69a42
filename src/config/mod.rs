pub mod tool;

pub use tool::{DoltBinConfig, LoggingConfig, ToolConfig};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "doltcli")]
#[command(about = "Typed queries over a Dolt repository")]
pub struct CliConfig {
    /// Repository directory
    #[arg(long, default_value = ".")]
    pub repo: std::path::PathBuf,

    /// TOML tool config (dolt path, timeout, log level)
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Working-set status
    Status,
    /// Commit history, most recent first
    Log {
        #[arg(short = 'n', long)]
        number: Option<usize>,
        #[arg(long)]
        commit: Option<String>,
    },
    /// Tables in the working set
    Ls {
        #[arg(long)]
        system: bool,
        #[arg(long)]
        all: bool,
    },
    /// Branches, with the active branch called out
    Branch,
    /// Run a query and print its results
    Sql {
        #[arg(short, long)]
        query: String,
        #[arg(long, default_value = "csv")]
        format: String,
    },
    /// Version of the dolt binary
    Version,
}
