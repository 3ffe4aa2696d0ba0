//! Reported facts that produce day classifications.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::EventId;

/// The process that reported a fact.
///
/// The string tags are persisted inside day records and must keep their
/// meaning forever. New variants may be added; existing tags never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// A sick-leave application from the claimant or their doctor.
    Application,
    /// An income notice sent by the employer.
    EmployerNotice,
    /// A manual decision entered by a case worker.
    CaseworkerOverride,
    /// A correction coming from the payroll system.
    Payroll,
    /// Produced by the engine itself, e.g. when filling gaps.
    System,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Application,
        Self::EmployerNotice,
        Self::CaseworkerOverride,
        Self::Payroll,
        Self::System,
    ];

    /// Wire tag for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::EmployerNotice => "employer_notice",
            Self::CaseworkerOverride => "caseworker_override",
            Self::Payroll => "payroll",
            Self::System => "system",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application" => Ok(Self::Application),
            "employer_notice" => Ok(Self::EmployerNotice),
            "caseworker_override" => Ok(Self::CaseworkerOverride),
            "payroll" => Ok(Self::Payroll),
            "system" => Ok(Self::System),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event kind strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event kind: {0}")]
pub struct UnknownEventKind(pub String);

/// An immutable reported fact.
///
/// Days hold events behind an `Arc`, so one event can back every day of the
/// period it reported without copying.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier assigned by the reporting system.
    pub id: EventId,
    /// Which process reported the fact.
    pub kind: EventKind,
    /// When the fact was reported. Later reports win recency tie-breaks.
    pub reported_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event.
    pub const fn new(id: EventId, kind: EventKind, reported_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind,
            reported_at,
        }
    }

    /// Returns whichever of the two events was reported later.
    ///
    /// Equal timestamps favour `a`.
    #[must_use]
    pub fn latest<'a>(a: &'a Self, b: &'a Self) -> &'a Self {
        if b.reported_at > a.reported_at { b } else { a }
    }
}
