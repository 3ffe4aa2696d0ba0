//! Review command for listing days that need manual handling.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use dayline_core::{Day, Timeline};

use super::util::read_timeline;
use crate::Config;

#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Timeline file to inspect.
    pub file: PathBuf,
}

pub fn run<W: Write>(writer: &mut W, args: &ReviewArgs, config: &Config) -> Result<()> {
    let timeline = read_timeline(&args.file, config.decode_limits())?;
    write!(writer, "{}", format_review(&timeline))?;
    Ok(())
}

/// One line per undecided day, naming the days it replaced.
pub fn format_review(timeline: &Timeline) -> String {
    let mut output = String::new();
    let undecided: Vec<&Day> = timeline.undecided_days().collect();

    if undecided.is_empty() {
        output.push_str("no days need review\n");
        return output;
    }

    let _ = writeln!(output, "{} day(s) need review:", undecided.len());
    for day in undecided {
        let replaced: Vec<String> = day
            .lineage()
            .iter()
            .map(|loser| {
                format!(
                    "{} ({} {})",
                    loser.kind(),
                    loser.event().kind,
                    loser.event().id
                )
            })
            .collect();
        let _ = writeln!(output, "  {}  {}", day.date(), replaced.join(", "));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    use crate::commands::fixtures::{application, caseworker_override, employer_notice};

    #[test]
    fn review_lists_conflicts_with_their_sources() {
        let timeline = application()
            .merge(&employer_notice())
            .merge(&caseworker_override());

        assert_snapshot!(format_review(&timeline), @r"
        1 day(s) need review:
          2024-01-11  SickDay (application soknad-1), WorkDay (employer_notice im-1), SickDay (caseworker_override cw-1)
        ");
    }

    #[test]
    fn review_reports_clean_timelines() {
        let timeline = application().merge(&employer_notice());
        assert_eq!(format_review(&timeline), "no days need review\n");
    }
}
