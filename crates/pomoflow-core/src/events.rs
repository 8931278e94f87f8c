use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Cycle, IntervalKind, SessionState};

/// Every state change in the engine produces an Event.
/// Callers dispatch side effects (logging, notification, music control)
/// off these; the engine itself never performs effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        index: usize,
        kind: IntervalKind,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// An interval ran to completion. Carries the retired cycle so the
    /// caller can hand it to the cycle log.
    IntervalCompleted {
        index: usize,
        cycle: Cycle,
        next_index: usize,
        next_kind: IntervalKind,
        /// True when continuity is Full and the next interval is already
        /// running.
        auto_played: bool,
        at: DateTime<Utc>,
    },
    SessionSkipped {
        from_index: usize,
        to_index: usize,
        cycle: Cycle,
        at: DateTime<Utc>,
    },
    SessionReset {
        cycle: Cycle,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        index: usize,
        kind: IntervalKind,
        elapsed_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The cycle retired by this event, if any.
    pub fn retired_cycle(&self) -> Option<&Cycle> {
        match self {
            Event::IntervalCompleted { cycle, .. }
            | Event::SessionSkipped { cycle, .. }
            | Event::SessionReset { cycle, .. } => Some(cycle),
            _ => None,
        }
    }
}
