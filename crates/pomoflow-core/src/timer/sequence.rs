use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    Activity,
    ShortBreak,
    LongBreak,
}

impl IntervalKind {
    pub fn is_break(&self) -> bool {
        !matches!(self, IntervalKind::Activity)
    }

    /// Stable string form, used as the database column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalKind::Activity => "activity",
            IntervalKind::ShortBreak => "short_break",
            IntervalKind::LongBreak => "long_break",
        }
    }
}

impl FromStr for IntervalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activity" => Ok(IntervalKind::Activity),
            "short_break" | "short-break" => Ok(IntervalKind::ShortBreak),
            "long_break" | "long-break" => Ok(IntervalKind::LongBreak),
            other => Err(format!("unknown interval kind: {other}")),
        }
    }
}

/// A typed segment of the Pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub kind: IntervalKind,
    pub duration_secs: u64,
}

/// Ordered list of intervals making up one full round.
///
/// The engine wraps back to index 0 after the last interval, so the
/// sequence only ever holds a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub intervals: Vec<Interval>,
}

impl Sequence {
    /// Build the alternating Activity/ShortBreak sequence with the final
    /// break promoted to LongBreak.
    ///
    /// `rounds` is the number of activities before a long break; a value
    /// of 0 is treated as 1 so the sequence is never empty. Durations are
    /// non-structural: changing them never changes sequence length or the
    /// kind at any index.
    pub fn build(
        activity_secs: u64,
        short_break_secs: u64,
        long_break_secs: u64,
        rounds: u32,
    ) -> Self {
        let rounds = rounds.max(1);
        let mut intervals = Vec::with_capacity(rounds as usize * 2);
        for i in 0..rounds {
            intervals.push(Interval {
                kind: IntervalKind::Activity,
                duration_secs: activity_secs,
            });
            let last = i + 1 == rounds;
            intervals.push(Interval {
                kind: if last {
                    IntervalKind::LongBreak
                } else {
                    IntervalKind::ShortBreak
                },
                duration_secs: if last { long_break_secs } else { short_break_secs },
            });
        }
        Self { intervals }
    }

    /// The classic 25/5 schedule with a 15-minute long break every 4 rounds.
    pub fn classic() -> Self {
        Self::build(25 * 60, 5 * 60, 15 * 60, 4)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Interval> {
        self.intervals.get(index).copied()
    }

    pub fn total_secs(&self) -> u64 {
        self.intervals.iter().map(|i| i.duration_secs).sum()
    }

    pub fn activity_count(&self) -> usize {
        self.intervals
            .iter()
            .filter(|i| i.kind == IntervalKind::Activity)
            .count()
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::classic()
    }
}
