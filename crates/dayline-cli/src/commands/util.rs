//! Shared utilities for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use dayline_core::{DecodeLimits, Timeline, timeline_from_json};
use dayline_db::Database;

use crate::Config;

/// Reads a timeline from a JSON file holding an array of day records.
pub fn read_timeline(path: &Path, limits: DecodeLimits) -> Result<Timeline> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let timeline = timeline_from_json(&json, limits)
        .with_context(|| format!("invalid timeline in {}", path.display()))?;
    tracing::debug!(path = %path.display(), days = timeline.len(), "read timeline");
    Ok(timeline)
}

/// Opens the configured database, creating its parent directory if needed.
pub fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}
