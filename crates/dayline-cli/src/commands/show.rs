//! Show command for printing a claimant's stored timeline.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use dayline_core::{ClaimantId, Timeline};

use super::util::open_database;
use crate::Config;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Claimant whose timeline to print.
    pub claimant: String,
    /// Output as JSON day records.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &ShowArgs, config: &Config) -> Result<()> {
    let claimant = ClaimantId::new(args.claimant.as_str()).context("invalid claimant")?;
    let db = open_database(config)?;
    let timeline = db
        .load_timeline(&claimant, config.decode_limits())
        .with_context(|| format!("failed to load timeline for {claimant}"))?;

    if args.json {
        serde_json::to_writer_pretty(&mut *writer, &timeline)?;
        writeln!(writer)?;
    } else {
        write!(writer, "{}", format_timeline(&claimant, &timeline))?;
    }
    Ok(())
}

/// Format a timeline as a table, one row per date.
pub fn format_timeline(claimant: &ClaimantId, timeline: &Timeline) -> String {
    let mut output = String::new();

    let (Ok(start), Ok(end)) = (timeline.start_date(), timeline.end_date()) else {
        let _ = writeln!(output, "No days stored for {claimant}.");
        return output;
    };

    let _ = writeln!(output, "TIMELINE {claimant} ({start} to {end})");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "{:<10}  {:<14}  {:<19}  {:<10}  Replaced",
        "Date", "Kind", "Source", "Event"
    );
    let _ = writeln!(
        output,
        "──────────  ──────────────  ───────────────────  ──────────  ────────"
    );
    for day in timeline {
        let event = day.event();
        let _ = writeln!(
            output,
            "{:<10}  {:<14}  {:<19}  {:<10}  {}",
            day.date().to_string(),
            day.kind().as_str(),
            event.kind.as_str(),
            event.id.as_str(),
            day.lineage().len()
        );
    }
    output
}
