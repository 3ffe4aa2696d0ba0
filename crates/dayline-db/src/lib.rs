//! Storage layer for dayline.
//!
//! Persists claimant timelines using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but not shared without external
//! synchronization. Use one instance per thread, or wrap it in a `Mutex`.
//!
//! # Schema
//!
//! One row per claimant and date. The `record` column stores the serialized
//! day (see [`dayline_core::DayRecord`]) including its full lineage; the
//! `kind` column duplicates the record's top-level kind so review queries do
//! not have to decode JSON.
//!
//! Dates are stored as ISO 8601 TEXT (`YYYY-MM-DD`), so lexicographic
//! ordering matches chronological ordering.

use std::path::Path;

use chrono::NaiveDate;
use dayline_core::{
    ClaimantId, DayKind, DayRecord, DecodeLimits, DeserializationError, Timeline,
    timeline_from_records,
};
use rusqlite::{Connection, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored record is not valid JSON of the expected shape.
    #[error("invalid record for {claimant} on {date}")]
    Record {
        claimant: String,
        date: String,
        #[source]
        source: serde_json::Error,
    },
    /// A row's date column disagrees with the date inside its record.
    #[error("record for {claimant} stored on {row_date} is dated {record_date}")]
    DateMismatch {
        claimant: String,
        row_date: String,
        record_date: NaiveDate,
    },
    /// A stored timeline could not be rebuilt.
    #[error("failed to decode timeline for {claimant}")]
    Decode {
        claimant: String,
        #[source]
        source: DeserializationError,
    },
    /// Failed to encode a day for storage.
    #[error("failed to encode day {date}")]
    Encode {
        date: NaiveDate,
        #[source]
        source: serde_json::Error,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Outcome of replacing a claimant's stored timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveStats {
    pub days_written: usize,
    pub days_removed: usize,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- timeline_days: the current resolved day per claimant and date
            -- date: ISO 8601 calendar date (e.g., '2024-01-10')
            -- kind: top-level day kind tag (e.g., 'UndecidedDay')
            -- record: JSON day record including lineage
            CREATE TABLE IF NOT EXISTS timeline_days (
                claimant_id TEXT NOT NULL,
                date TEXT NOT NULL,
                kind TEXT NOT NULL,
                record TEXT NOT NULL,
                PRIMARY KEY (claimant_id, date)
            );

            CREATE INDEX IF NOT EXISTS idx_timeline_days_kind ON timeline_days(kind);
            ",
        )?;
        Ok(())
    }

    /// Replaces the claimant's stored timeline in a single transaction.
    pub fn save_timeline(
        &mut self,
        claimant: &ClaimantId,
        timeline: &Timeline,
    ) -> Result<SaveStats, DbError> {
        let rows = timeline
            .flatten()
            .map(|day| {
                let record = serde_json::to_string(&day.to_record()).map_err(|source| {
                    DbError::Encode {
                        date: day.date(),
                        source,
                    }
                })?;
                Ok((day.date().to_string(), day.kind().as_str(), record))
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        let tx = self.conn.transaction()?;
        let days_removed = tx.execute(
            "DELETE FROM timeline_days WHERE claimant_id = ?",
            [claimant.as_str()],
        )?;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO timeline_days (claimant_id, date, kind, record)
                VALUES (?, ?, ?, ?)
                ",
            )?;
            for (date, kind, record) in &rows {
                stmt.execute(params![claimant.as_str(), date, kind, record])?;
            }
        }
        tx.commit()?;

        tracing::debug!(
            claimant = %claimant,
            days_written = rows.len(),
            days_removed,
            "saved timeline"
        );
        Ok(SaveStats {
            days_written: rows.len(),
            days_removed,
        })
    }

    /// Loads the claimant's timeline; an unknown claimant yields an empty one.
    ///
    /// A single corrupt record fails the whole load.
    pub fn load_timeline(
        &self,
        claimant: &ClaimantId,
        limits: DecodeLimits,
    ) -> Result<Timeline, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT date, record
            FROM timeline_days
            WHERE claimant_id = ?
            ORDER BY date ASC
            ",
        )?;
        let rows = stmt.query_map([claimant.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (date, record) = row?;
            let record: DayRecord =
                serde_json::from_str(&record).map_err(|source| DbError::Record {
                    claimant: claimant.to_string(),
                    date: date.clone(),
                    source,
                })?;
            if record.date.to_string() != date {
                tracing::warn!(claimant = %claimant, row_date = %date, "stored record is misfiled");
                return Err(DbError::DateMismatch {
                    claimant: claimant.to_string(),
                    row_date: date,
                    record_date: record.date,
                });
            }
            records.push(record);
        }

        timeline_from_records(&records, limits).map_err(|source| {
            tracing::warn!(claimant = %claimant, error = %source, "stored timeline is corrupt");
            DbError::Decode {
                claimant: claimant.to_string(),
                source,
            }
        })
    }

    /// Dates holding an `UndecidedDay` for the claimant, in order.
    pub fn undecided_dates(&self, claimant: &ClaimantId) -> Result<Vec<String>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT date
            FROM timeline_days
            WHERE claimant_id = ? AND kind = ?
            ORDER BY date ASC
            ",
        )?;
        let rows = stmt.query_map(
            params![claimant.as_str(), DayKind::UndecidedDay.as_str()],
            |row| row.get(0),
        )?;
        let mut dates = Vec::new();
        for row in rows {
            dates.push(row?);
        }
        Ok(dates)
    }

    /// Lists claimants with at least one stored day, ordered by ID.
    pub fn claimants(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT DISTINCT claimant_id
            FROM timeline_days
            ORDER BY claimant_id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut claimants = Vec::new();
        for row in rows {
            claimants.push(row?);
        }
        Ok(claimants)
    }
}
