//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Ownergraph - Resolve the ultimate owners of media outlets.
#[derive(Debug, Parser)]
#[command(name = "ownergraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Entity file (tab-delimited)
    #[arg(long, global = true, env = "OWNERGRAPH_ENTITIES")]
    pub entities: Option<PathBuf>,

    /// Relation file (tab-delimited)
    #[arg(long, global = true, env = "OWNERGRAPH_RELATIONS")]
    pub relations: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one owner per line)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the ultimate owners of an entity
    Owners(OwnersArgs),

    /// Load the corpus and report data-quality diagnostics
    Check,

    /// Enter interactive REPL mode
    Repl,

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Arguments for the owners command.
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct OwnersArgs {
    /// Entity name (case-insensitive); defaults to `query.default_target`
    pub name: Option<String>,

    /// Accept an entity of any type, not only media
    #[arg(long, conflicts_with = "type_code")]
    pub any_type: bool,

    /// Require this type code instead of the configured media code
    #[arg(long)]
    pub type_code: Option<i64>,

    /// Maximum number of owners to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Hide owners holding less than this percentage
    #[arg(long)]
    pub min_percent: Option<f64>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
