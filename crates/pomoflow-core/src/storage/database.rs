//! SQLite-based cycle storage.
//!
//! Provides persistent storage for:
//! - Completed cycles (one row per retired cycle with a start timestamp)
//! - Key-value store for application state (serialized engine)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::timer::IntervalKind;

use super::data_dir;

/// A logged cycle as read back from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub id: i64,
    pub kind: IntervalKind,
    pub duration_secs: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub elapsed_secs: u64,
}

/// SQLite database for cycle storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/pomoflow/pomoflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .join("pomoflow.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS cycles (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                kind          TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                started_at    TEXT NOT NULL,
                ended_at      TEXT NOT NULL,
                elapsed_secs  INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_cycles_started_at ON cycles(started_at);
            CREATE INDEX IF NOT EXISTS idx_cycles_kind ON cycles(kind);",
        )?;
        Ok(())
    }

    /// Insert a cycle row, returning its id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn insert_cycle(
        &self,
        kind: IntervalKind,
        duration_secs: u64,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        elapsed_secs: u64,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO cycles (kind, duration_secs, started_at, ended_at, elapsed_secs)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                kind.as_str(),
                duration_secs as i64,
                started_at.to_rfc3339(),
                ended_at.to_rfc3339(),
                elapsed_secs as i64,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Cycles whose start falls in `[from, to)`, newest first.
    ///
    /// Rows that fail to decode (unknown kind, bad timestamp) are
    /// skipped, leaving the rest of the result intact.
    pub fn cycles_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CycleRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, duration_secs, started_at, ended_at, elapsed_secs
             FROM cycles
             WHERE started_at >= ?1 AND started_at < ?2
             ORDER BY started_at DESC",
        )?;
        let rows = stmt.query_map(params![from.to_rfc3339(), to.to_rfc3339()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, kind, duration, started, ended, elapsed) = row?;
            if let Some(record) = decode_row(id, &kind, duration, &started, &ended, elapsed) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn decode_row(
    id: i64,
    kind: &str,
    duration_secs: i64,
    started_at: &str,
    ended_at: &str,
    elapsed_secs: i64,
) -> Option<CycleRecord> {
    let kind: IntervalKind = kind.parse().ok()?;
    let started_at = DateTime::parse_from_rfc3339(started_at).ok()?.with_timezone(&Utc);
    let ended_at = DateTime::parse_from_rfc3339(ended_at).ok()?.with_timezone(&Utc);
    Some(CycleRecord {
        id,
        kind,
        duration_secs: duration_secs.max(0) as u64,
        started_at,
        ended_at,
        elapsed_secs: elapsed_secs.max(0) as u64,
    })
}
