//! Fixtures shared by the unit tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::day::Day;
use crate::day_kind::DayKind;
use crate::event::{Event, EventKind};
use crate::types::EventId;

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

/// An event reported `hour` hours after 2024-01-01T00:00Z.
pub fn event(id: &str, kind: EventKind, hour: i64) -> Arc<Event> {
    let base: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().expect("valid timestamp");
    Arc::new(Event::new(
        EventId::new(id).expect("valid id"),
        kind,
        base + Duration::hours(hour),
    ))
}

pub fn day(on: &str, kind: DayKind, event: &Arc<Event>) -> Day {
    Day::new(date(on), kind, Arc::clone(event))
}
