//! Pairwise precedence rules for two days on the same date.
//!
//! # Rule order
//!
//! The first matching rule wins:
//!
//! 1. **Explicit conflicts** become a new `UndecidedDay`:
//!    a work day from an employer notice against a sick day from a case
//!    worker, and a sick day from an application reported at or after an
//!    employer's vacation notice for the same date.
//! 2. **Null absorption**: a `NullDay` loses to anything.
//! 3. **Recency**: same kind on both sides, the later report wins
//!    (left on equal timestamps).
//! 4. **Specificity**: vacation beats sickness and foreign stays, work beats
//!    sickness, first-hand reports beat filled gaps, and a case-worker
//!    override settles an undecided day.
//! 5. **Fallback**: anything else becomes a new `UndecidedDay`.
//!
//! Every rule is written for both operand orders, so the resulting kind
//! never depends on which timeline was on the left.

use std::fmt;
use std::sync::Arc;

use crate::day::Day;
use crate::day_kind::DayKind::{
    FilledDay, ForeignDay, NullDay, SickDay, SickWeekendDay, UndecidedDay, VacationDay, WorkDay,
};
use crate::event::Event;
use crate::event::EventKind::{Application, CaseworkerOverride, EmployerNotice};

/// Which rule settled a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    ExplicitConflict,
    NullAbsorption,
    Recency,
    Specificity,
    CaseworkerOverride,
    Fallback,
}

impl Rule {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExplicitConflict => "explicit_conflict",
            Self::NullAbsorption => "null_absorption",
            Self::Recency => "recency",
            Self::Specificity => "specificity",
            Self::CaseworkerOverride => "caseworker_override",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a rule decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The left day wins and records the right one.
    Left,
    /// The right day wins and records the left one.
    Right,
    /// Neither wins; a new undecided day records both.
    Undecided,
}

/// A rule together with its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decision {
    pub rule: Rule,
    pub outcome: Outcome,
}

impl Decision {
    const fn new(rule: Rule, outcome: Outcome) -> Self {
        Self { rule, outcome }
    }
}

/// Picks the rule that applies to `left` and `right` without building a day.
pub fn decide(left: &Day, right: &Day) -> Decision {
    use Outcome::{Left, Right, Undecided};

    let l = (left.kind(), left.event().kind);
    let r = (right.kind(), right.event().kind);

    match (l, r) {
        ((WorkDay, EmployerNotice), (SickDay, CaseworkerOverride))
        | ((SickDay, CaseworkerOverride), (WorkDay, EmployerNotice)) => {
            Decision::new(Rule::ExplicitConflict, Undecided)
        }
        ((SickDay, Application), (VacationDay, EmployerNotice))
            if left.event().reported_at >= right.event().reported_at =>
        {
            Decision::new(Rule::ExplicitConflict, Undecided)
        }
        ((VacationDay, EmployerNotice), (SickDay, Application))
            if right.event().reported_at >= left.event().reported_at =>
        {
            Decision::new(Rule::ExplicitConflict, Undecided)
        }

        (_, (NullDay, _)) => Decision::new(Rule::NullAbsorption, Left),
        ((NullDay, _), _) => Decision::new(Rule::NullAbsorption, Right),

        ((a, _), (b, _)) if a == b => {
            let outcome = if right.event().reported_at > left.event().reported_at {
                Right
            } else {
                Left
            };
            Decision::new(Rule::Recency, outcome)
        }

        ((VacationDay, _), (SickDay | ForeignDay, _))
        | ((WorkDay, _), (SickDay, _))
        | ((WorkDay | SickDay | SickWeekendDay | VacationDay, _), (FilledDay, _)) => {
            Decision::new(Rule::Specificity, Left)
        }
        ((SickDay | ForeignDay, _), (VacationDay, _))
        | ((SickDay, _), (WorkDay, _))
        | ((FilledDay, _), (WorkDay | SickDay | SickWeekendDay | VacationDay, _)) => {
            Decision::new(Rule::Specificity, Right)
        }

        ((_, CaseworkerOverride), (UndecidedDay, _)) => {
            Decision::new(Rule::CaseworkerOverride, Left)
        }
        ((UndecidedDay, _), (_, CaseworkerOverride)) => {
            Decision::new(Rule::CaseworkerOverride, Right)
        }

        _ => Decision::new(Rule::Fallback, Undecided),
    }
}

/// Resolves two days on the same date into one.
///
/// Never fails: combinations without a rule produce an `UndecidedDay`.
/// Dates are not compared. A winner keeps its own date and a synthesized
/// `UndecidedDay` takes the left day's.
pub fn resolve(left: &Day, right: &Day) -> Day {
    let decision = decide(left, right);
    match decision.outcome {
        Outcome::Left => left.clone().superseding([right]),
        Outcome::Right => right.clone().superseding([left]),
        Outcome::Undecided => {
            tracing::trace!(
                date = %left.date(),
                left = %left.kind(),
                right = %right.kind(),
                rule = %decision.rule,
                "conflict needs review"
            );
            undecided(left, right)
        }
    }
}

fn undecided(left: &Day, right: &Day) -> Day {
    let event = if Event::latest(left.event(), right.event()) == right.event() {
        right.shared_event()
    } else {
        left.shared_event()
    };
    Day::new(left.date(), UndecidedDay, Arc::clone(event)).superseding([left, right])
}
