//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::apply::ApplyArgs;
use crate::commands::lineage::LineageArgs;
use crate::commands::merge::MergeArgs;
use crate::commands::review::ReviewArgs;
use crate::commands::show::ShowArgs;

/// Sickness timeline day-resolution engine.
///
/// Merges per-date day records reported by different sources into one
/// authoritative timeline and keeps the full audit lineage of every
/// superseded record.
#[derive(Debug, Parser)]
#[command(name = "dayline", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge two timeline files and print the result as JSON.
    Merge(MergeArgs),

    /// List days in a timeline file that need manual review.
    Review(ReviewArgs),

    /// Print the lineage tree of one date.
    Lineage(LineageArgs),

    /// Merge a timeline file into a claimant's stored timeline.
    Apply(ApplyArgs),

    /// Print a claimant's stored timeline.
    Show(ShowArgs),
}
