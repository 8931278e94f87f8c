//! Cycle log.
//!
//! A retired cycle is persisted exactly once, at the moment the engine
//! transitions away from it (completion, skip or reset). Cycles that were
//! never started leave no trace.

use chrono::{DateTime, Duration, Utc};

use crate::error::DatabaseError;
use crate::storage::{CycleRecord, Database};
use crate::timer::Cycle;

/// Historical record of retired cycles, backed by the SQLite database.
pub struct CycleLog<'a> {
    db: &'a Database,
}

impl<'a> CycleLog<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Persist a retired cycle.
    ///
    /// Returns the row id, or `None` when the cycle has no start
    /// timestamp (a session that never played is discarded).
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record(&self, cycle: &Cycle) -> Result<Option<i64>, DatabaseError> {
        let Some(started_at) = cycle.started_at else {
            return Ok(None);
        };
        let ended_at = cycle
            .ended_at
            .unwrap_or(started_at + Duration::seconds(cycle.elapsed_secs as i64));
        let id = self.db.insert_cycle(
            cycle.kind,
            cycle.duration_secs,
            started_at,
            ended_at,
            cycle.elapsed_secs,
        )?;
        Ok(Some(id))
    }

    /// Logged cycles whose start falls in `[from, to)`, newest first.
    pub fn between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CycleRecord>, DatabaseError> {
        self.db.cycles_between(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{Interval, IntervalKind};

    fn started_cycle() -> Cycle {
        let now = Utc::now();
        Cycle {
            kind: IntervalKind::Activity,
            duration_secs: 1500,
            started_at: Some(now),
            ended_at: Some(now + Duration::seconds(42)),
            elapsed_secs: 42,
        }
    }

    #[test]
    fn record_and_read_back() {
        let db = Database::open_memory().unwrap();
        let log = CycleLog::new(&db);
        let id = log.record(&started_cycle()).unwrap();
        assert!(id.is_some());

        let now = Utc::now();
        let records = log
            .between(now - Duration::hours(1), now + Duration::hours(1))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].elapsed_secs, 42);
    }

    #[test]
    fn unstarted_cycle_is_discarded() {
        let db = Database::open_memory().unwrap();
        let log = CycleLog::new(&db);
        let cycle = Cycle::fresh(Interval {
            kind: IntervalKind::Activity,
            duration_secs: 1500,
        });
        assert!(log.record(&cycle).unwrap().is_none());

        let now = Utc::now();
        let records = log
            .between(now - Duration::hours(1), now + Duration::hours(1))
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_end_falls_back_to_start_plus_elapsed() {
        let db = Database::open_memory().unwrap();
        let log = CycleLog::new(&db);
        let mut cycle = started_cycle();
        cycle.ended_at = None;
        log.record(&cycle).unwrap();

        let now = Utc::now();
        let records = log
            .between(now - Duration::hours(1), now + Duration::hours(1))
            .unwrap();
        assert_eq!(
            records[0].ended_at,
            records[0].started_at + Duration::seconds(42)
        );
    }
}
