//! Lineage command for printing the audit tree of one date.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use dayline_core::Day;

use super::util::read_timeline;
use crate::Config;

#[derive(Debug, Args)]
pub struct LineageArgs {
    /// Timeline file to inspect.
    pub file: PathBuf,
    /// Date to explain (YYYY-MM-DD).
    pub date: NaiveDate,
}

pub fn run<W: Write>(writer: &mut W, args: &LineageArgs, config: &Config) -> Result<()> {
    let timeline = read_timeline(&args.file, config.decode_limits())?;
    match timeline.get(args.date) {
        Some(day) => write!(writer, "{}", format_lineage(day))?,
        None => writeln!(writer, "no day recorded on {}", args.date)?,
    }
    Ok(())
}

/// Renders a day and its lineage, two spaces of indent per level.
pub fn format_lineage(day: &Day) -> String {
    let mut output = String::new();
    write_day(&mut output, day, 0);
    output
}

fn write_day(output: &mut String, day: &Day, depth: usize) {
    let event = day.event();
    let _ = writeln!(
        output,
        "{:indent$}{} {} <- {} {} ({})",
        "",
        day.date(),
        day.kind(),
        event.kind,
        event.id,
        event.reported_at.format("%Y-%m-%d %H:%M"),
        indent = depth * 2
    );
    for loser in day.lineage() {
        write_day(output, loser, depth + 1);
    }
}
