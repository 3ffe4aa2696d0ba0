use std::io::Write;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use dayline_cli::commands::{apply, lineage, merge, review, show};
use dayline_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON on stdout stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    match command {
        Commands::Merge(args) => merge::run(&mut writer, args, &config)?,
        Commands::Review(args) => review::run(&mut writer, args, &config)?,
        Commands::Lineage(args) => lineage::run(&mut writer, args, &config)?,
        Commands::Apply(args) => apply::run(&mut writer, args, &config)?,
        Commands::Show(args) => show::run(&mut writer, args, &config)?,
    }
    writer.flush()?;

    Ok(())
}
