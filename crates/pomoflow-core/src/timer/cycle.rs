use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sequence::{Interval, IntervalKind};

/// One concrete occurrence of an interval with timing data.
///
/// A fresh cycle has neither timestamp. `started_at` is stamped on the
/// first play, `ended_at` when the cycle is retired (completion, skip or
/// reset). Only cycles with a start are ever persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    pub kind: IntervalKind,
    pub duration_secs: u64,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    pub elapsed_secs: u64,
}

impl Cycle {
    pub fn fresh(interval: Interval) -> Self {
        Self {
            kind: interval.kind,
            duration_secs: interval.duration_secs,
            started_at: None,
            ended_at: None,
            elapsed_secs: 0,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cycle_has_no_timestamps() {
        let c = Cycle::fresh(Interval {
            kind: IntervalKind::Activity,
            duration_secs: 1500,
        });
        assert!(!c.is_started());
        assert!(c.ended_at.is_none());
        assert_eq!(c.elapsed_secs, 0);
    }
}
