//! Apply command for merging reported days into a claimant's stored timeline.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use dayline_core::{ClaimantId, Day, Timeline};

use super::util::{open_database, read_timeline};
use crate::Config;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Claimant whose stored timeline receives the days.
    pub claimant: String,
    /// Timeline file with the newly reported days.
    pub file: PathBuf,
}

/// What changed when a timeline was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplySummary {
    pub days_reported: usize,
    pub dates_changed: usize,
    pub days_stored: usize,
    /// Dates of the merged timeline holding an `UndecidedDay`, in order.
    pub needs_review: Vec<NaiveDate>,
}

pub fn run<W: Write>(writer: &mut W, args: &ApplyArgs, config: &Config) -> Result<()> {
    let claimant = ClaimantId::new(args.claimant.as_str()).context("invalid claimant")?;
    let incoming = read_timeline(&args.file, config.decode_limits())?;

    let mut db = open_database(config)?;
    let stored = db
        .load_timeline(&claimant, config.decode_limits())
        .with_context(|| format!("failed to load timeline for {claimant}"))?;

    let (merged, summary) = apply(&stored, &incoming);
    db.save_timeline(&claimant, &merged)
        .with_context(|| format!("failed to save timeline for {claimant}"))?;

    writeln!(
        writer,
        "Applied {} day(s) to {claimant}: {} date(s) changed, {} stored",
        summary.days_reported, summary.dates_changed, summary.days_stored
    )?;
    if summary.needs_review.is_empty() {
        writeln!(writer, "No days need review.")?;
    } else {
        let dates: Vec<String> = summary.needs_review.iter().map(ToString::to_string).collect();
        writeln!(
            writer,
            "{} day(s) need review: {}",
            dates.len(),
            dates.join(", ")
        )?;
    }
    Ok(())
}

/// Merges `incoming` into `stored` and counts what changed.
pub fn apply(stored: &Timeline, incoming: &Timeline) -> (Timeline, ApplySummary) {
    let merged = stored.merge(incoming);
    let dates_changed = merged
        .flatten()
        .filter(|day| stored.get(day.date()) != Some(*day))
        .count();
    let summary = ApplySummary {
        days_reported: incoming.len(),
        dates_changed,
        days_stored: merged.len(),
        needs_review: merged.undecided_days().map(Day::date).collect(),
    };
    tracing::debug!(?summary, "applied timeline");
    (merged, summary)
}
