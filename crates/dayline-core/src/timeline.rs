//! Date-indexed collections of days.
//!
//! A [`Timeline`] holds at most one concrete day per date. Null days are
//! never stored: asking for a missing date yields a fresh null day instead.

use std::collections::BTreeMap;
use std::ops::{Add, RangeInclusive};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::day::{Day, DaySpan};
use crate::day_kind::DayKind;
use crate::event::Event;

/// Errors from building or querying a timeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// Bounds were requested on a timeline without concrete days.
    #[error("timeline is empty")]
    Empty,
    /// Two days were supplied for the same date.
    #[error("duplicate day for {0}")]
    DuplicateDate(NaiveDate),
    /// Concatenated timelines share a date.
    #[error("timelines overlap on {0}")]
    Overlap(NaiveDate),
    /// A period ends before it starts.
    #[error("period ends ({end}) before it starts ({start})")]
    InvertedPeriod { start: NaiveDate, end: NaiveDate },
}

/// An ordered, per-date collection of days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Day>", into = "Vec<Day>")]
pub struct Timeline {
    days: BTreeMap<NaiveDate, Day>,
}

impl Timeline {
    /// An empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a timeline from days on distinct dates. Null days are dropped.
    pub fn from_days(days: impl IntoIterator<Item = Day>) -> Result<Self, TimelineError> {
        let mut map = BTreeMap::new();
        for day in days {
            if day.is_null() {
                continue;
            }
            let date = day.date();
            if map.insert(date, day).is_some() {
                return Err(TimelineError::DuplicateDate(date));
            }
        }
        Ok(Self { days: map })
    }

    /// One day of `kind` for every date in `start..=end`, all backed by `event`.
    pub fn period(
        start: NaiveDate,
        end: NaiveDate,
        kind: DayKind,
        event: &Arc<Event>,
    ) -> Result<Self, TimelineError> {
        Self::period_with(start, end, event, |_| kind)
    }

    /// A reported sickness period: weekdays become `SickDay`, Saturdays and
    /// Sundays become `SickWeekendDay`.
    pub fn sick_period(
        start: NaiveDate,
        end: NaiveDate,
        event: &Arc<Event>,
    ) -> Result<Self, TimelineError> {
        Self::period_with(start, end, event, |date| match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayKind::SickWeekendDay,
            _ => DayKind::SickDay,
        })
    }

    fn period_with(
        start: NaiveDate,
        end: NaiveDate,
        event: &Arc<Event>,
        kind_for: impl Fn(NaiveDate) -> DayKind,
    ) -> Result<Self, TimelineError> {
        if end < start {
            return Err(TimelineError::InvertedPeriod { start, end });
        }
        let days = start
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| (date, Day::new(date, kind_for(date), Arc::clone(event))))
            .filter(|(_, day)| !day.is_null())
            .collect();
        Ok(Self { days })
    }

    /// Fills every date between the bounds that has no day with a `FilledDay`.
    #[must_use]
    pub fn fill_gaps(&self, event: &Arc<Event>) -> Self {
        let (Some(start), Some(end)) = (self.first_date(), self.last_date()) else {
            return self.clone();
        };
        let mut days = self.days.clone();
        for date in start.iter_days().take_while(|date| *date <= end) {
            days.entry(date)
                .or_insert_with(|| Day::new(date, DayKind::FilledDay, Arc::clone(event)));
        }
        Self { days }
    }

    fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    /// First date with a concrete day.
    pub fn start_date(&self) -> Result<NaiveDate, TimelineError> {
        self.first_date().ok_or(TimelineError::Empty)
    }

    /// Last date with a concrete day.
    pub fn end_date(&self) -> Result<NaiveDate, TimelineError> {
        self.last_date().ok_or(TimelineError::Empty)
    }

    /// The stored day for `date`, or a fresh null day.
    pub fn day_at(&self, date: NaiveDate) -> Day {
        self.days
            .get(&date)
            .cloned()
            .unwrap_or_else(|| Day::null(date))
    }

    /// Borrowing lookup; `None` where [`Timeline::day_at`] would return a null day.
    pub fn get(&self, date: NaiveDate) -> Option<&Day> {
        self.days.get(&date)
    }

    /// Concrete days in date order. Can be called any number of times.
    pub fn flatten(&self) -> impl Iterator<Item = &Day> + '_ {
        self.days.values()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of concrete days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Days whose date falls within `range`.
    #[must_use]
    pub fn subset(&self, range: RangeInclusive<NaiveDate>) -> Self {
        if range.start() > range.end() {
            return Self::new();
        }
        Self {
            days: self
                .days
                .range(range)
                .map(|(date, day)| (*date, day.clone()))
                .collect(),
        }
    }

    /// Days that need manual review.
    pub fn undecided_days(&self) -> impl Iterator<Item = &Day> + '_ {
        self.flatten()
            .filter(|day| day.kind() == DayKind::UndecidedDay)
    }

    /// True when both timelines hold a concrete day on at least one shared date.
    pub fn overlaps(&self, other: &Self) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.days.keys().any(|date| large.days.contains_key(date))
    }

    /// Appends a timeline with no shared dates.
    pub fn concat(&self, other: &Self) -> Result<Self, TimelineError> {
        if let Some(date) = self.days.keys().find(|date| other.days.contains_key(date)) {
            return Err(TimelineError::Overlap(*date));
        }
        let mut days = self.days.clone();
        days.extend(other.days.iter().map(|(date, day)| (*date, day.clone())));
        Ok(Self { days })
    }

    /// Resolves both timelines date by date into a new timeline.
    ///
    /// Dates held by only one side pass through unchanged. Neither input is
    /// modified.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut days = BTreeMap::new();
        let mut undecided = 0_usize;
        let dates = self.days.keys().chain(other.days.keys()).copied();
        for date in dates {
            if days.contains_key(&date) {
                continue;
            }
            let resolved = self.day_at(date).resolve(&other.day_at(date));
            if resolved.is_null() {
                continue;
            }
            if resolved.kind() == DayKind::UndecidedDay {
                undecided += 1;
            }
            days.insert(date, resolved);
        }
        tracing::debug!(
            left = self.len(),
            right = other.len(),
            merged = days.len(),
            undecided,
            "merged timelines"
        );
        Self { days }
    }
}

impl DaySpan for Timeline {
    fn length(&self) -> usize {
        self.len()
    }

    fn at(&self, date: NaiveDate) -> Day {
        self.day_at(date)
    }
}

impl Add for &Timeline {
    type Output = Timeline;

    fn add(self, other: Self) -> Timeline {
        self.merge(other)
    }
}

impl TryFrom<Vec<Day>> for Timeline {
    type Error = TimelineError;

    fn try_from(days: Vec<Day>) -> Result<Self, Self::Error> {
        Self::from_days(days)
    }
}

impl From<Timeline> for Vec<Day> {
    fn from(timeline: Timeline) -> Self {
        timeline.days.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Day;
    type IntoIter = std::collections::btree_map::Values<'a, NaiveDate, Day>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::test_support::{date, day, event};

    fn range(start: &str, end: &str, kind: DayKind, event: &Arc<Event>) -> Timeline {
        Timeline::period(date(start), date(end), kind, event).unwrap()
    }

    #[test]
    fn bounds_fail_on_empty_timeline() {
        let empty = Timeline::new();
        assert_eq!(empty.start_date(), Err(TimelineError::Empty));
        assert_eq!(empty.end_date(), Err(TimelineError::Empty));
    }

    #[test]
    fn bounds_follow_stored_days() {
        let application = event("a", EventKind::Application, 1);
        let timeline = range("2024-01-03", "2024-01-07", DayKind::SickDay, &application);
        assert_eq!(timeline.start_date(), Ok(date("2024-01-03")));
        assert_eq!(timeline.end_date(), Ok(date("2024-01-07")));
        assert_eq!(timeline.length(), 5);
    }

    #[test]
    fn day_at_is_total() {
        let timeline = Timeline::new();
        let day = timeline.day_at(date("2024-02-29"));
        assert!(day.is_null());
        assert_eq!(day.date(), date("2024-02-29"));
    }

    #[test]
    fn from_days_rejects_duplicates_and_drops_null_days() {
        let application = event("a", EventKind::Application, 1);
        let sick = day("2024-01-10", DayKind::SickDay, &application);

        let err = Timeline::from_days([sick.clone(), sick.clone()]).unwrap_err();
        assert_eq!(err, TimelineError::DuplicateDate(date("2024-01-10")));

        let timeline = Timeline::from_days([sick, Day::null(date("2024-01-11"))]).unwrap();
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn period_rejects_inverted_bounds() {
        let application = event("a", EventKind::Application, 1);
        let err = Timeline::period(
            date("2024-01-10"),
            date("2024-01-01"),
            DayKind::SickDay,
            &application,
        )
        .unwrap_err();
        assert!(matches!(err, TimelineError::InvertedPeriod { .. }));
    }

    #[test]
    fn sick_period_marks_weekends() {
        let application = event("a", EventKind::Application, 1);
        // 2024-01-05 is a Friday.
        let timeline =
            Timeline::sick_period(date("2024-01-05"), date("2024-01-08"), &application).unwrap();
        let kinds: Vec<_> = timeline.flatten().map(Day::kind).collect();
        assert_eq!(
            kinds,
            vec![
                DayKind::SickDay,
                DayKind::SickWeekendDay,
                DayKind::SickWeekendDay,
                DayKind::SickDay,
            ]
        );
    }

    #[test]
    fn fill_gaps_only_touches_missing_dates() {
        let application = event("a", EventKind::Application, 1);
        let filler = event("gap", EventKind::System, 2);
        let timeline = range("2024-01-01", "2024-01-02", DayKind::SickDay, &application)
            .concat(&range("2024-01-05", "2024-01-05", DayKind::WorkDay, &application))
            .unwrap();

        let filled = timeline.fill_gaps(&filler);
        let kinds: Vec<_> = filled.flatten().map(Day::kind).collect();
        assert_eq!(
            kinds,
            vec![
                DayKind::SickDay,
                DayKind::SickDay,
                DayKind::FilledDay,
                DayKind::FilledDay,
                DayKind::WorkDay,
            ]
        );
        assert!(Timeline::new().fill_gaps(&filler).is_empty());
    }

    #[test]
    fn flatten_is_restartable() {
        let application = event("a", EventKind::Application, 1);
        let timeline = range("2024-01-01", "2024-01-03", DayKind::SickDay, &application);
        let first: Vec<_> = timeline.flatten().collect();
        let second: Vec<_> = timeline.flatten().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn subset_is_inclusive() {
        let application = event("a", EventKind::Application, 1);
        let timeline = range("2024-01-01", "2024-01-10", DayKind::SickDay, &application);
        let window = timeline.subset(date("2024-01-03")..=date("2024-01-05"));
        assert_eq!(window.len(), 3);
        assert_eq!(window.start_date(), Ok(date("2024-01-03")));
        assert!(timeline
            .subset(date("2024-01-05")..=date("2024-01-03"))
            .is_empty());
    }

    #[test]
    fn overlaps_requires_a_shared_concrete_date() {
        let application = event("a", EventKind::Application, 1);
        let a = range("2024-01-01", "2024-01-05", DayKind::SickDay, &application);
        let b = range("2024-01-05", "2024-01-09", DayKind::SickDay, &application);
        let c = range("2024-01-06", "2024-01-09", DayKind::SickDay, &application);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&Timeline::new()));
    }

    #[test]
    fn concat_rejects_shared_dates() {
        let application = event("a", EventKind::Application, 1);
        let a = range("2024-01-01", "2024-01-05", DayKind::SickDay, &application);
        let b = range("2024-01-05", "2024-01-09", DayKind::SickDay, &application);
        assert_eq!(a.concat(&b), Err(TimelineError::Overlap(date("2024-01-05"))));
    }

    #[test]
    fn merge_resolves_overlapping_dates() {
        let application = event("soknad", EventKind::Application, 1);
        let notice = event("im", EventKind::EmployerNotice, 2);
        let a = range("2024-01-10", "2024-01-10", DayKind::SickDay, &application);
        let b = range("2024-01-10", "2024-01-10", DayKind::VacationDay, &notice);

        let merged = &a + &b;
        let resolved = merged.day_at(date("2024-01-10"));
        assert_eq!(resolved.kind(), DayKind::VacationDay);
        assert_eq!(resolved.lineage(), &[Arc::new(a.day_at(date("2024-01-10")))]);
    }

    #[test]
    fn merge_flags_contradicting_employer_and_caseworker() {
        let notice = event("im", EventKind::EmployerNotice, 1);
        let caseworker = event("cw", EventKind::CaseworkerOverride, 2);
        let a = range("2024-01-05", "2024-01-05", DayKind::WorkDay, &notice);
        let b = range("2024-01-05", "2024-01-05", DayKind::SickDay, &caseworker);

        let merged = a.merge(&b);
        let undecided: Vec<_> = merged.undecided_days().collect();
        assert_eq!(undecided.len(), 1);
        let identities = undecided[0].lineage_identities();
        assert!(identities.contains(&a.day_at(date("2024-01-05")).identity()));
        assert!(identities.contains(&b.day_at(date("2024-01-05")).identity()));
    }

    #[test]
    fn merge_of_disjoint_ranges_passes_days_through() {
        let application = event("a", EventKind::Application, 1);
        let notice = event("b", EventKind::EmployerNotice, 2);
        let a = range("2024-01-01", "2024-01-10", DayKind::SickDay, &application);
        let b = range("2024-01-11", "2024-01-20", DayKind::WorkDay, &notice);

        let merged = a.merge(&b);
        assert_eq!(merged.start_date(), Ok(date("2024-01-01")));
        assert_eq!(merged.end_date(), Ok(date("2024-01-20")));
        assert_eq!(merged.len(), 20);
        for day in &a {
            assert_eq!(merged.get(day.date()), Some(day));
        }
        for day in &b {
            assert_eq!(merged.get(day.date()), Some(day));
        }
    }

    #[test]
    fn merge_keeps_inputs_untouched() {
        let application = event("a", EventKind::Application, 1);
        let payroll = event("p", EventKind::Payroll, 2);
        let a = range("2024-01-01", "2024-01-03", DayKind::SickDay, &application);
        let b = range("2024-01-02", "2024-01-04", DayKind::SickDay, &payroll);
        let (a_before, b_before) = (a.clone(), b.clone());

        let _ = a.merge(&b);
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn merge_preserves_lineage_of_every_overlapping_date() {
        let application = event("a", EventKind::Application, 1);
        let notice = event("n", EventKind::EmployerNotice, 2);
        let a = Timeline::sick_period(date("2024-03-01"), date("2024-03-14"), &application).unwrap();
        let b = range("2024-03-08", "2024-03-21", DayKind::WorkDay, &notice);

        let merged = a.merge(&b);
        for date in a.flatten().map(Day::date).filter(|d| b.get(*d).is_some()) {
            let identities = merged.day_at(date).lineage_identities();
            let resolved = merged.day_at(date).identity();
            for original in [a.day_at(date), b.day_at(date)] {
                let id = original.identity();
                assert!(
                    identities.contains(&id) || resolved == id,
                    "lost {id:?} on {date}"
                );
            }
        }
    }

    #[test]
    fn merge_kinds_do_not_depend_on_call_order() {
        let application = event("a", EventKind::Application, 1);
        let notice = event("n", EventKind::EmployerNotice, 2);
        let a = Timeline::sick_period(date("2024-03-01"), date("2024-03-14"), &application).unwrap();
        let b = range("2024-03-08", "2024-03-21", DayKind::VacationDay, &notice);

        let ab: Vec<_> = a.merge(&b).flatten().map(|d| (d.date(), d.kind())).collect();
        let ba: Vec<_> = b.merge(&a).flatten().map(|d| (d.date(), d.kind())).collect();
        assert_eq!(ab, ba);
    }

    #[test]
    fn serializes_as_ordered_array() {
        let application = event("a", EventKind::Application, 1);
        let timeline = range("2024-01-01", "2024-01-02", DayKind::SickDay, &application);
        let json = serde_json::to_value(&timeline).unwrap();
        let dates: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|day| day["date"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);

        let parsed: Timeline = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, timeline);
    }
}
