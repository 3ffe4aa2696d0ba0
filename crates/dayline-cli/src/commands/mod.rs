//! CLI subcommand implementations.

pub mod apply;
pub mod lineage;
pub mod merge;
pub mod review;
pub mod show;
pub mod util;

#[cfg(test)]
pub(crate) mod fixtures;
