//! Wire records for persisting days with their full lineage.
//!
//! # Format
//!
//! ```json
//! {
//!   "kind": "VacationDay",
//!   "date": "2024-01-10",
//!   "sourceEvent": { "kind": "employer_notice", "id": "im-1", "reportedAt": "2024-01-12T09:00:00Z" },
//!   "supersededDays": [ ... ]
//! }
//! ```
//!
//! Tag strings and field names are persisted history: new kinds may be
//! added, existing ones never change meaning. Unknown extra fields are
//! ignored so older readers keep working.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::day::Day;
use crate::day_kind::{DayKind, UnknownDayKind};
use crate::event::{Event, EventKind, UnknownEventKind};
use crate::timeline::{Timeline, TimelineError};
use crate::types::{EventId, ValidationError};

/// Default maximum lineage nesting accepted when decoding.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Errors from decoding stored records.
///
/// Decoding never returns a partially rebuilt day.
#[derive(Debug, Error)]
pub enum DeserializationError {
    #[error("invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    UnknownDayKind(#[from] UnknownDayKind),
    #[error(transparent)]
    UnknownEventKind(#[from] UnknownEventKind),
    #[error("invalid source event: {0}")]
    InvalidEventId(#[from] ValidationError),
    /// Lineage may only hold concrete days.
    #[error("null day recorded as superseded on {date}")]
    NullInLineage { date: NaiveDate },
    /// Lineage entries must share their parent's date.
    #[error("day on {expected} records a superseded day on {found}")]
    LineageDateMismatch {
        expected: NaiveDate,
        found: NaiveDate,
    },
    #[error("lineage nested deeper than {max_depth} levels")]
    DepthExceeded { max_depth: usize },
    #[error("invalid timeline: {0}")]
    Timeline(#[from] TimelineError),
}

/// Limits applied while decoding untrusted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Deepest lineage nesting accepted; the top-level day is depth 0.
    pub max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Serialized source event reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEventRecord {
    pub kind: String,
    pub id: String,
    pub reported_at: DateTime<Utc>,
}

/// Serialized day, recursively including the days it superseded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub kind: String,
    pub date: NaiveDate,
    pub source_event: SourceEventRecord,
    pub superseded_days: Vec<DayRecord>,
}

impl Day {
    /// Encodes this day and its whole lineage tree.
    pub fn to_record(&self) -> DayRecord {
        let event = self.event();
        DayRecord {
            kind: self.kind().as_str().to_string(),
            date: self.date(),
            source_event: SourceEventRecord {
                kind: event.kind.as_str().to_string(),
                id: event.id.as_str().to_string(),
                reported_at: event.reported_at,
            },
            superseded_days: self.lineage().iter().map(|day| day.to_record()).collect(),
        }
    }

    /// Decodes a record with the default limits.
    pub fn from_record(record: &DayRecord) -> Result<Self, DeserializationError> {
        Self::from_record_with(record, DecodeLimits::default())
    }

    /// Decodes a record, rebuilding its lineage in stored order.
    pub fn from_record_with(
        record: &DayRecord,
        limits: DecodeLimits,
    ) -> Result<Self, DeserializationError> {
        Decoder::new(limits).day(record, 0).map(|(day, _)| day)
    }
}

impl From<Day> for DayRecord {
    fn from(day: Day) -> Self {
        day.to_record()
    }
}

impl TryFrom<DayRecord> for Day {
    type Error = DeserializationError;

    fn try_from(record: DayRecord) -> Result<Self, Self::Error> {
        Self::from_record(&record)
    }
}

/// Decodes one day from JSON text.
pub fn day_from_json(json: &str, limits: DecodeLimits) -> Result<Day, DeserializationError> {
    let record: DayRecord = serde_json::from_str(json)?;
    Day::from_record_with(&record, limits)
}

/// Decodes a timeline from a JSON array of day records.
pub fn timeline_from_json(
    json: &str,
    limits: DecodeLimits,
) -> Result<Timeline, DeserializationError> {
    let records: Vec<DayRecord> = serde_json::from_str(json)?;
    timeline_from_records(&records, limits)
}

/// Decodes a timeline from day records, sharing identical events.
pub fn timeline_from_records(
    records: &[DayRecord],
    limits: DecodeLimits,
) -> Result<Timeline, DeserializationError> {
    let mut decoder = Decoder::new(limits);
    let days = records
        .iter()
        .map(|record| decoder.day(record, 0).map(|(day, _)| day))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Timeline::from_days(days)?)
}

/// Recursive decoder that interns identical events and lineage entries.
///
/// The flattened lineage layout repeats every earlier loser inside each
/// later one; interning turns those repeats back into shared entries.
struct Decoder<'r> {
    limits: DecodeLimits,
    events: HashMap<Event, Arc<Event>>,
    /// Decoded lineage entries with the nesting depth below them.
    days: HashMap<&'r DayRecord, (Arc<Day>, usize)>,
}

impl<'r> Decoder<'r> {
    fn new(limits: DecodeLimits) -> Self {
        Self {
            limits,
            events: HashMap::new(),
            days: HashMap::new(),
        }
    }

    fn depth_exceeded(&self) -> DeserializationError {
        DeserializationError::DepthExceeded {
            max_depth: self.limits.max_depth,
        }
    }

    /// Decodes `record` found at `depth`; also returns the nesting below it.
    fn day(
        &mut self,
        record: &'r DayRecord,
        depth: usize,
    ) -> Result<(Day, usize), DeserializationError> {
        if depth > self.limits.max_depth {
            return Err(self.depth_exceeded());
        }

        let kind: DayKind = record.kind.parse()?;
        let event = self.event(&record.source_event)?;

        let mut superseded = Vec::with_capacity(record.superseded_days.len());
        let mut nesting = 0;
        for child in &record.superseded_days {
            if child.date != record.date {
                return Err(DeserializationError::LineageDateMismatch {
                    expected: record.date,
                    found: child.date,
                });
            }
            let (day, below) = self.lineage_entry(child, depth + 1)?;
            superseded.push(day);
            nesting = nesting.max(below + 1);
        }

        Ok((Day::from_parts(record.date, kind, event, superseded), nesting))
    }

    fn lineage_entry(
        &mut self,
        record: &'r DayRecord,
        depth: usize,
    ) -> Result<(Arc<Day>, usize), DeserializationError> {
        if let Some((day, below)) = self.days.get(record) {
            if depth + below > self.limits.max_depth {
                return Err(self.depth_exceeded());
            }
            return Ok((Arc::clone(day), *below));
        }

        let (day, below) = self.day(record, depth)?;
        if day.is_null() {
            return Err(DeserializationError::NullInLineage { date: day.date() });
        }
        let day = Arc::new(day);
        self.days.insert(record, (Arc::clone(&day), below));
        Ok((day, below))
    }

    fn event(&mut self, record: &SourceEventRecord) -> Result<Arc<Event>, DeserializationError> {
        let event = Event::new(
            EventId::new(record.id.as_str())?,
            record.kind.parse::<EventKind>()?,
            record.reported_at,
        );
        Ok(Arc::clone(
            self.events
                .entry(event)
                .or_insert_with_key(|event| Arc::new(event.clone())),
        ))
    }
}
