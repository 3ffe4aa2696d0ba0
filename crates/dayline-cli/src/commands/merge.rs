//! Merge command for combining two timeline files.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;

use super::util::read_timeline;
use crate::Config;

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Timeline file whose days are the left-hand operands.
    pub left: PathBuf,
    /// Timeline file whose days are the right-hand operands.
    pub right: PathBuf,
    /// Refuse to merge timelines that report days on the same date.
    #[arg(long)]
    pub reject_overlap: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &MergeArgs, config: &Config) -> Result<()> {
    let limits = config.decode_limits();
    let left = read_timeline(&args.left, limits)?;
    let right = read_timeline(&args.right, limits)?;

    if args.reject_overlap && left.overlaps(&right) {
        bail!(
            "{} and {} report days on the same date",
            args.left.display(),
            args.right.display()
        );
    }

    let merged = left.merge(&right);
    let undecided = merged.undecided_days().count();
    if undecided > 0 {
        tracing::info!(undecided, "merged timeline has days that need review");
    }

    serde_json::to_writer_pretty(&mut *writer, &merged)?;
    writeln!(writer)?;
    Ok(())
}
