//! Timelines shared by the command tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use dayline_core::{Day, DayKind, Event, EventId, EventKind, Timeline};

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn event(id: &str, kind: EventKind, reported_at: &str) -> Arc<Event> {
    Arc::new(Event::new(
        EventId::new(id).unwrap(),
        kind,
        reported_at.parse().unwrap(),
    ))
}

/// Sick-leave application covering Monday 2024-01-08 to Friday 2024-01-12.
pub fn application() -> Timeline {
    let soknad = event("soknad-1", EventKind::Application, "2024-01-13T08:00:00Z");
    Timeline::sick_period(date("2024-01-08"), date("2024-01-12"), &soknad).unwrap()
}

/// Employer notice: work on the 10th and 11th, vacation on the 12th.
pub fn employer_notice() -> Timeline {
    let notice = event("im-1", EventKind::EmployerNotice, "2024-01-14T08:00:00Z");
    Timeline::from_days([
        Day::new(date("2024-01-10"), DayKind::WorkDay, Arc::clone(&notice)),
        Day::new(date("2024-01-11"), DayKind::WorkDay, Arc::clone(&notice)),
        Day::new(date("2024-01-12"), DayKind::VacationDay, notice),
    ])
    .unwrap()
}

/// Case worker marking the 11th as sick.
pub fn caseworker_override() -> Timeline {
    let override_event = event("cw-1", EventKind::CaseworkerOverride, "2024-01-15T08:00:00Z");
    Timeline::from_days([Day::new(
        date("2024-01-11"),
        DayKind::SickDay,
        override_event,
    )])
    .unwrap()
}

pub fn write_timeline(dir: &Path, name: &str, timeline: &Timeline) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(timeline).unwrap()).unwrap();
    path
}
