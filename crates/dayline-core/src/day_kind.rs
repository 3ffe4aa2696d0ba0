//! Day classification enum as the single source of truth for kind tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayKind {
    SickDay,
    SickWeekendDay,
    VacationDay,
    WorkDay,
    ForeignDay,
    /// Inferred placeholder for a gap between reported days.
    FilledDay,
    /// Conflict that could not be resolved automatically; needs review.
    UndecidedDay,
    /// No record at all for the date.
    NullDay,
}

impl DayKind {
    /// Every day kind, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::SickDay,
        Self::SickWeekendDay,
        Self::VacationDay,
        Self::WorkDay,
        Self::ForeignDay,
        Self::FilledDay,
        Self::UndecidedDay,
        Self::NullDay,
    ];

    /// Wire tag for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SickDay => "SickDay",
            Self::SickWeekendDay => "SickWeekendDay",
            Self::VacationDay => "VacationDay",
            Self::WorkDay => "WorkDay",
            Self::ForeignDay => "ForeignDay",
            Self::FilledDay => "FilledDay",
            Self::UndecidedDay => "UndecidedDay",
            Self::NullDay => "NullDay",
        }
    }

    /// True for the "no record" placeholder.
    #[must_use]
    pub const fn is_null(self) -> bool {
        matches!(self, Self::NullDay)
    }

    /// True for every kind that carries information.
    #[must_use]
    pub const fn is_concrete(self) -> bool {
        !self.is_null()
    }
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayKind {
    type Err = UnknownDayKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownDayKind(s.to_string()))
    }
}

impl Serialize for DayKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DayKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown day kind strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day kind: {0}")]
pub struct UnknownDayKind(pub String);
