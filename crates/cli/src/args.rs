//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use factor_config::IndexMappingKind;

/// Inspect the factor update pipeline configuration.
#[derive(Debug, Parser)]
#[command(name = "factor-cli", version, about)]
pub struct Cli {
    /// Project root holding the config/ directory (skips ancestor discovery)
    #[arg(long, global = true, env = "FACTOR_UPDATE_CONFIG_ROOT")]
    pub config_root: Option<PathBuf>,

    /// Prefix for environment variable overrides
    #[arg(long, global = true, default_value = factor_config::constants::DEFAULT_ENV_PREFIX)]
    pub env_prefix: String,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the resolved value for a dotted key
    Get {
        /// Dotted key path, e.g. database.host
        key: String,
        /// Value to print when the key is unresolved
        #[arg(long)]
        default: Option<String>,
    },
    /// Resolve a logical path name via the legacy path table
    Path {
        /// Logical data-type name, e.g. output_factor_exposure
        logical_name: String,
    },
    /// List the data sources for a category in priority order
    Sources {
        /// Data category, e.g. factor
        category: String,
    },
    /// Map an index display name to its machine-readable alias
    Index {
        display_name: String,
        #[arg(long, value_enum, default_value_t = IndexKind::Short)]
        kind: IndexKind,
    },
    /// Load every configuration source and report what was found
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndexKind {
    Short,
    Monthly,
}

impl From<IndexKind> for IndexMappingKind {
    fn from(kind: IndexKind) -> Self {
        match kind {
            IndexKind::Short => Self::Short,
            IndexKind::Monthly => Self::Monthly,
        }
    }
}
