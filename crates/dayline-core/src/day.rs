//! The atomic unit of a timeline: one date, one classification.
//!
//! A [`Day`] keeps the days it replaced. Recording a loser adds the loser's
//! own lineage and then the loser, so the winner's direct lineage list holds
//! every replaced day while each entry keeps its nested history for audits.
//! Entries are reference-counted: repeated resolution of one date shares the
//! history it already has instead of copying it.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, LazyLock};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day_kind::DayKind;
use crate::event::{Event, EventKind};
use crate::record::DayRecord;
use crate::resolution;
use crate::types::EventId;

/// Event backing every [`DayKind::NullDay`].
static UNTOUCHED: LazyLock<Arc<Event>> = LazyLock::new(|| {
    Arc::new(Event::new(
        EventId::untouched(),
        EventKind::System,
        chrono::DateTime::default(),
    ))
});

/// Something that covers dates and can be queried one date at a time.
///
/// A single [`Day`] behaves as a one-element timeline.
pub trait DaySpan {
    /// Number of days held.
    fn length(&self) -> usize;

    /// The day at `date`, or a [`DayKind::NullDay`] when nothing is held there.
    fn at(&self, date: NaiveDate) -> Day;
}

/// One calendar date's classification plus the days it superseded.
///
/// Serializes through [`DayRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DayRecord", try_from = "DayRecord")]
pub struct Day {
    date: NaiveDate,
    kind: DayKind,
    event: Arc<Event>,
    superseded: Vec<Arc<Day>>,
}

/// The fields that identify a day within an audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayIdentity {
    pub date: NaiveDate,
    pub kind: DayKind,
    pub event_id: EventId,
}

impl Day {
    /// Creates a day without lineage.
    pub const fn new(date: NaiveDate, kind: DayKind, event: Arc<Event>) -> Self {
        Self {
            date,
            kind,
            event,
            superseded: Vec::new(),
        }
    }

    /// The "no record" placeholder for `date`.
    pub fn null(date: NaiveDate) -> Self {
        Self::new(date, DayKind::NullDay, Arc::clone(&UNTOUCHED))
    }

    /// Rebuilds a day from stored parts, lineage included.
    pub(crate) const fn from_parts(
        date: NaiveDate,
        kind: DayKind,
        event: Arc<Event>,
        superseded: Vec<Arc<Self>>,
    ) -> Self {
        Self {
            date,
            kind,
            event,
            superseded,
        }
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn kind(&self) -> DayKind {
        self.kind
    }

    /// The event that produced this classification.
    pub fn event(&self) -> &Event {
        &self.event
    }

    pub(crate) const fn shared_event(&self) -> &Arc<Event> {
        &self.event
    }

    /// Days replaced by this one, oldest first.
    pub fn lineage(&self) -> &[Arc<Self>] {
        &self.superseded
    }

    pub const fn is_null(&self) -> bool {
        self.kind.is_null()
    }

    pub fn identity(&self) -> DayIdentity {
        DayIdentity {
            date: self.date,
            kind: self.kind,
            event_id: self.event.id.clone(),
        }
    }

    /// Identities of every day reachable through the lineage, at any depth.
    pub fn lineage_identities(&self) -> BTreeSet<DayIdentity> {
        let mut identities = BTreeSet::new();
        let mut pending: Vec<&Self> = self.superseded.iter().map(Arc::as_ref).collect();
        while let Some(day) = pending.pop() {
            if identities.insert(day.identity()) {
                pending.extend(day.superseded.iter().map(Arc::as_ref));
            }
        }
        identities
    }

    /// Deepest nesting level of the lineage tree; 0 for a day without lineage.
    pub fn lineage_depth(&self) -> usize {
        self.depth_with(&mut HashMap::new())
    }

    /// Depth with shared entries measured once.
    fn depth_with(&self, seen: &mut HashMap<*const Self, usize>) -> usize {
        let mut deepest = 0;
        for entry in &self.superseded {
            let key = Arc::as_ptr(entry);
            let depth = match seen.get(&key) {
                Some(depth) => *depth,
                None => {
                    let depth = entry.depth_with(seen);
                    seen.insert(key, depth);
                    depth
                }
            };
            deepest = deepest.max(depth + 1);
        }
        deepest
    }

    /// Records `others` as replaced by this day.
    ///
    /// Null days are skipped. Each recorded day contributes its own lineage
    /// first, then itself. The recorded days are never modified, and the
    /// lineage they already carry is shared rather than copied.
    pub fn supersede<'a>(&mut self, others: impl IntoIterator<Item = &'a Self>) {
        for other in others {
            if other.is_null() {
                continue;
            }
            self.superseded.extend(other.superseded.iter().map(Arc::clone));
            self.superseded.push(Arc::new(other.clone()));
        }
    }

    /// Owned variant of [`Day::supersede`].
    #[must_use]
    pub fn superseding<'a>(mut self, others: impl IntoIterator<Item = &'a Self>) -> Self {
        self.supersede(others);
        self
    }

    /// Resolves a conflict between this day and `other` on the same date.
    ///
    /// Total and deterministic; see [`resolution`](crate::resolution) for
    /// the precedence rules. Both days are expected on the same date; on a
    /// mismatch nothing panics and an undecided result takes this day's date.
    #[must_use]
    pub fn resolve(&self, other: &Self) -> Self {
        resolution::resolve(self, other)
    }
}

impl DaySpan for Day {
    fn length(&self) -> usize {
        1
    }

    fn at(&self, date: NaiveDate) -> Day {
        if date == self.date {
            self.clone()
        } else {
            Self::null(date)
        }
    }
}
