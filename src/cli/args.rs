//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::Rank;

/// Minimal phylogenetic trees of Lepidoptera specimens from wing-scale records
#[derive(Parser, Debug)]
#[command(name = "scaletree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./.scaletree.toml if present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath, env = "SCALETREE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and print the minimal tree for a specimen table
    Tree {
        /// Specimen CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Innermost rank to include (overrides config)
        #[arg(short, long)]
        leaf_rank: Option<Rank>,
        /// Only use records of this family
        #[arg(short, long)]
        family: Option<String>,
        /// Skip simplification, print the raw hierarchy
        #[arg(long)]
        raw: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List backbone families that have records
    Families {
        /// Specimen CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show the path from a taxon to its tree anchor
    Lineage {
        /// Specimen CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Taxon name (case and spaces are ignored)
        taxon: String,
        /// Innermost rank to include (overrides config)
        #[arg(short, long)]
        leaf_rank: Option<Rank>,
    },

    /// Print the configured family backbone
    Backbone,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented text tree
    Text,
    /// JSON nodes, edges and families
    Json,
}
