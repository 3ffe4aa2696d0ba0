//! Core domain logic for dayline.
//!
//! This crate contains the fundamental types and logic for:
//! - Days: one classified calendar date with its audit lineage
//! - Resolution: the precedence rules that settle two days on one date
//! - Timelines: date-indexed day collections and their merge operator
//! - Records: the persisted wire format for days and timelines
//!
//! Everything here is pure and synchronous. Values are `Send + Sync`, so
//! callers may resolve many claimants in parallel, one timeline pair each.

mod day;
pub mod day_kind;
pub mod event;
pub mod record;
pub mod resolution;
mod timeline;
pub mod types;

#[cfg(test)]
mod test_support;

pub use day::{Day, DayIdentity, DaySpan};
pub use day_kind::{DayKind, UnknownDayKind};
pub use event::{Event, EventKind, UnknownEventKind};
pub use record::{
    DayRecord, DecodeLimits, DeserializationError, SourceEventRecord, day_from_json,
    timeline_from_json, timeline_from_records,
};
pub use resolution::{Decision, Outcome, Rule};
pub use timeline::{Timeline, TimelineError};
pub use types::{ClaimantId, EventId, ValidationError};
