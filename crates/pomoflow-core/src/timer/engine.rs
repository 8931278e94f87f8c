//! Session engine implementation.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` about once
//! per second. Ticks received while not running are ignored.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(sequence, Continuity::Partial);
//! engine.play();
//! // At ~1 Hz:
//! engine.tick(); // Returns Some(Event) when an interval completes
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::cycle::Cycle;
use super::sequence::{Interval, IntervalKind, Sequence};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
}

/// Policy governing whether the engine auto-advances and auto-plays
/// across interval boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Continuity {
    /// Stop at the boundary: same interval, fresh cycle, back to Idle.
    None,
    /// Advance to the next interval but wait for an explicit play.
    Partial,
    /// Advance and keep running, wrapping after the last interval.
    Full,
}

/// Core session engine.
///
/// Counts elapsed seconds upward within the current interval. No internal
/// thread - the caller drives it with `tick()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEngine {
    sequence: Sequence,
    continuity: Continuity,
    state: SessionState,
    index: usize,
    cycle: Cycle,
    elapsed_secs: u64,
}

impl SessionEngine {
    /// Create a new engine positioned at the first interval, Idle.
    pub fn new(sequence: Sequence, continuity: Continuity) -> Self {
        let cycle = Cycle::fresh(first_interval(&sequence));
        Self {
            sequence,
            continuity,
            state: SessionState::Idle,
            index: 0,
            cycle,
            elapsed_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn continuity(&self) -> Continuity {
        self.continuity
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn cycle(&self) -> &Cycle {
        &self.cycle
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn current_kind(&self) -> IntervalKind {
        self.cycle.kind
    }

    pub fn remaining_secs(&self) -> u64 {
        self.cycle.duration_secs.saturating_sub(self.elapsed_secs)
    }

    /// Build a full display-state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            index: self.index,
            kind: self.cycle.kind,
            elapsed_secs: self.elapsed_secs,
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn play(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Idle | SessionState::Paused => {
                if self.elapsed_secs == 0 && self.cycle.started_at.is_none() {
                    self.cycle.started_at = Some(Utc::now());
                }
                self.state = SessionState::Running;
                Some(Event::SessionStarted {
                    index: self.index,
                    kind: self.cycle.kind,
                    duration_secs: self.cycle.duration_secs,
                    at: Utc::now(),
                })
            }
            SessionState::Running => None, // Already running.
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            SessionState::Running => {
                self.state = SessionState::Paused;
                Some(Event::SessionPaused {
                    elapsed_secs: self.elapsed_secs,
                    remaining_secs: self.remaining_secs(),
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Call about once per second. Increments elapsed time by exactly one
    /// second; when the interval duration is reached the cycle is retired
    /// and the engine advances per the continuity mode.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.elapsed_secs += 1;
        self.cycle.elapsed_secs = self.elapsed_secs;
        if self.elapsed_secs < self.cycle.duration_secs {
            return None;
        }

        let finished_index = self.index;
        let finished = self.retire_cycle();
        let auto_played = match self.continuity {
            Continuity::None => {
                // Stay put, fresh cycle at the same index.
                self.reload_cycle();
                self.state = SessionState::Idle;
                false
            }
            Continuity::Partial => {
                self.advance();
                self.state = SessionState::Idle;
                false
            }
            Continuity::Full => {
                self.advance();
                self.cycle.started_at = Some(Utc::now());
                // state stays Running
                true
            }
        };
        Some(Event::IntervalCompleted {
            index: finished_index,
            cycle: finished,
            next_index: self.index,
            next_kind: self.cycle.kind,
            auto_played,
            at: Utc::now(),
        })
    }

    pub fn skip(&mut self) -> Option<Event> {
        let from = self.index;
        let retired = self.retire_cycle();
        self.advance();
        self.state = SessionState::Idle;
        Some(Event::SessionSkipped {
            from_index: from,
            to_index: self.index,
            cycle: retired,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        let retired = self.retire_cycle();
        self.index = 0;
        self.reload_cycle();
        self.state = SessionState::Idle;
        Some(Event::SessionReset {
            cycle: retired,
            at: Utc::now(),
        })
    }

    /// Apply a rebuilt sequence and continuity mode.
    ///
    /// While Idle this resets the session to index 0 with a fresh cycle.
    /// Mid-session (Running or Paused) the index and elapsed time are
    /// preserved; the active cycle picks up the kind and duration at its
    /// (clamped) index so duration-only changes keep the session in place.
    pub fn apply_plan(&mut self, sequence: Sequence, continuity: Continuity) {
        self.sequence = sequence;
        self.continuity = continuity;
        match self.state {
            SessionState::Idle => {
                self.index = 0;
                self.reload_cycle();
            }
            SessionState::Running | SessionState::Paused => {
                if self.index >= self.sequence.len() && !self.sequence.is_empty() {
                    self.index = self.sequence.len() - 1;
                }
                let interval = self.interval_at(self.index);
                self.cycle.kind = interval.kind;
                self.cycle.duration_secs = interval.duration_secs;
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn interval_at(&self, index: usize) -> Interval {
        self.sequence.get(index).unwrap_or(Interval {
            kind: IntervalKind::Activity,
            duration_secs: 0,
        })
    }

    /// Finalize the active cycle and return it, leaving a copy in place
    /// until the caller repositions the engine.
    fn retire_cycle(&mut self) -> Cycle {
        self.cycle.elapsed_secs = self.elapsed_secs;
        if self.cycle.started_at.is_some() {
            self.cycle.ended_at = Some(Utc::now());
        }
        self.cycle.clone()
    }

    fn reload_cycle(&mut self) {
        self.cycle = Cycle::fresh(self.interval_at(self.index));
        self.elapsed_secs = 0;
    }

    fn advance(&mut self) {
        self.index = if self.index + 1 < self.sequence.len() {
            self.index + 1
        } else {
            0 // Wrap around.
        };
        self.reload_cycle();
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(Sequence::classic(), Continuity::Partial)
    }
}

fn first_interval(sequence: &Sequence) -> Interval {
    sequence.get(0).unwrap_or(Interval {
        kind: IntervalKind::Activity,
        duration_secs: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_engine(continuity: Continuity) -> SessionEngine {
        // 3s activity, 2s short break, 4s long break, 2 rounds.
        SessionEngine::new(Sequence::build(3, 2, 4, 2), continuity)
    }

    #[test]
    fn play_pause_play() {
        let mut engine = SessionEngine::default();
        assert_eq!(engine.state(), SessionState::Idle);

        assert!(engine.play().is_some());
        assert_eq!(engine.state(), SessionState::Running);
        assert!(engine.cycle().is_started());

        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), SessionState::Paused);

        assert!(engine.play().is_some());
        assert_eq!(engine.state(), SessionState::Running);
    }

    #[test]
    fn play_while_running_is_noop() {
        let mut engine = SessionEngine::default();
        engine.play();
        assert!(engine.play().is_none());
    }

    #[test]
    fn start_timestamp_only_set_at_zero_elapsed() {
        let mut engine = short_engine(Continuity::Partial);
        engine.play();
        let first_start = engine.cycle().started_at;
        engine.tick();
        engine.pause();
        engine.play();
        assert_eq!(engine.cycle().started_at, first_start);
    }

    #[test]
    fn tick_ignored_unless_running() {
        let mut engine = short_engine(Continuity::Partial);
        assert!(engine.tick().is_none());
        assert_eq!(engine.elapsed_secs(), 0);

        engine.play();
        engine.tick();
        engine.pause();
        assert!(engine.tick().is_none());
        assert_eq!(engine.elapsed_secs(), 1);
    }

    #[test]
    fn tick_increments_by_one_and_nothing_else() {
        let mut engine = short_engine(Continuity::Partial);
        engine.play();
        let index = engine.index();
        let kind = engine.current_kind();
        assert!(engine.tick().is_none()); // elapsed 1 < 3
        assert_eq!(engine.elapsed_secs(), 1);
        assert_eq!(engine.index(), index);
        assert_eq!(engine.current_kind(), kind);
        assert_eq!(engine.state(), SessionState::Running);
    }

    #[test]
    fn completion_at_duration_boundary() {
        let mut engine = short_engine(Continuity::Partial);
        engine.play();
        engine.tick();
        engine.tick();
        // elapsed == duration - 1; this tick completes the interval.
        let event = engine.tick().expect("completion event");
        match event {
            Event::IntervalCompleted { index, cycle, next_index, .. } => {
                assert_eq!(index, 0);
                assert_eq!(cycle.elapsed_secs, 3);
                assert!(cycle.started_at.is_some());
                assert!(cycle.ended_at.is_some());
                assert_eq!(next_index, 1);
            }
            other => panic!("expected IntervalCompleted, got {other:?}"),
        }
        assert_eq!(engine.state(), SessionState::Idle);
        assert_eq!(engine.elapsed_secs(), 0);
    }

    #[test]
    fn continuity_none_stays_on_same_interval() {
        let mut engine = short_engine(Continuity::None);
        engine.play();
        for _ in 0..2 {
            engine.tick();
        }
        let event = engine.tick().unwrap();
        match event {
            Event::IntervalCompleted { next_index, auto_played, .. } => {
                assert_eq!(next_index, 0);
                assert!(!auto_played);
            }
            other => panic!("expected IntervalCompleted, got {other:?}"),
        }
        assert_eq!(engine.state(), SessionState::Idle);
        assert_eq!(engine.index(), 0);
        assert!(!engine.cycle().is_started());
    }

    #[test]
    fn continuity_full_keeps_running_and_wraps() {
        let mut engine = short_engine(Continuity::Full);
        engine.play();
        // Walk the whole round: 3 + 2 + 3 + 4 seconds.
        let mut completions = 0;
        for _ in 0..12 {
            if let Some(Event::IntervalCompleted { auto_played, .. }) = engine.tick() {
                assert!(auto_played);
                completions += 1;
                assert_eq!(engine.state(), SessionState::Running);
            }
        }
        assert_eq!(completions, 4);
        // Wrapped back to the first activity.
        assert_eq!(engine.index(), 0);
        assert!(engine.cycle().is_started());
    }

    #[test]
    fn skip_zeroes_elapsed_and_advances() {
        let mut engine = short_engine(Continuity::Partial);
        engine.play();
        engine.tick();
        assert_eq!(engine.elapsed_secs(), 1);

        let event = engine.skip().unwrap();
        match event {
            Event::SessionSkipped { from_index, to_index, cycle, .. } => {
                assert_eq!(from_index, 0);
                assert_eq!(to_index, 1);
                assert_eq!(cycle.elapsed_secs, 1);
                assert!(cycle.ended_at.is_some());
            }
            other => panic!("expected SessionSkipped, got {other:?}"),
        }
        assert_eq!(engine.elapsed_secs(), 0);
        assert_eq!(engine.state(), SessionState::Idle);
    }

    #[test]
    fn skip_from_last_interval_wraps() {
        let mut engine = short_engine(Continuity::Partial);
        for _ in 0..3 {
            engine.skip();
        }
        assert_eq!(engine.index(), 3);
        engine.skip();
        assert_eq!(engine.index(), 0);
    }

    #[test]
    fn skip_without_start_leaves_no_end_timestamp() {
        let mut engine = short_engine(Continuity::Partial);
        let event = engine.skip().unwrap();
        match event {
            Event::SessionSkipped { cycle, .. } => {
                assert!(cycle.started_at.is_none());
                assert!(cycle.ended_at.is_none());
            }
            other => panic!("expected SessionSkipped, got {other:?}"),
        }
    }

    #[test]
    fn reset_goes_to_beginning() {
        let mut engine = short_engine(Continuity::Partial);
        engine.skip();
        engine.skip();
        assert_eq!(engine.index(), 2);
        engine.reset();
        assert_eq!(engine.index(), 0);
        assert_eq!(engine.state(), SessionState::Idle);
        assert_eq!(engine.elapsed_secs(), 0);
    }

    #[test]
    fn apply_plan_while_idle_resets_to_first_interval() {
        let mut engine = short_engine(Continuity::Partial);
        engine.skip();
        assert_eq!(engine.index(), 1);
        engine.apply_plan(Sequence::build(10, 5, 20, 3), Continuity::Full);
        assert_eq!(engine.index(), 0);
        assert_eq!(engine.elapsed_secs(), 0);
        assert_eq!(engine.continuity(), Continuity::Full);
        assert_eq!(engine.cycle().duration_secs, 10);
    }

    #[test]
    fn apply_plan_mid_session_preserves_position() {
        let mut engine = short_engine(Continuity::Partial);
        engine.play();
        engine.tick();
        engine.apply_plan(Sequence::build(10, 5, 20, 2), Continuity::Partial);
        assert_eq!(engine.index(), 0);
        assert_eq!(engine.elapsed_secs(), 1);
        assert_eq!(engine.state(), SessionState::Running);
        assert_eq!(engine.cycle().duration_secs, 10);
    }

    #[test]
    fn apply_plan_mid_session_clamps_index() {
        let mut engine = short_engine(Continuity::Partial);
        engine.skip();
        engine.skip();
        engine.skip(); // index 3
        engine.play();
        engine.apply_plan(Sequence::build(3, 2, 4, 1), Continuity::Partial);
        assert_eq!(engine.index(), 1);
    }

    #[test]
    fn snapshot_reflects_state() {
        let engine = short_engine(Continuity::Partial);
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                index,
                kind,
                elapsed_secs,
                remaining_secs,
                ..
            } => {
                assert_eq!(state, SessionState::Idle);
                assert_eq!(index, 0);
                assert_eq!(kind, IntervalKind::Activity);
                assert_eq!(elapsed_secs, 0);
                assert_eq!(remaining_secs, 3);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn engine_roundtrips_through_json() {
        let mut engine = short_engine(Continuity::Full);
        engine.play();
        engine.tick();
        let json = serde_json::to_string(&engine).unwrap();
        let restored: SessionEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), SessionState::Running);
        assert_eq!(restored.elapsed_secs(), 1);
        assert_eq!(restored.index(), 0);
    }
}
