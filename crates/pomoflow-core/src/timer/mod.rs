mod cycle;
mod engine;
mod sequence;

pub use cycle::Cycle;
pub use engine::{Continuity, SessionEngine, SessionState};
pub use sequence::{Interval, IntervalKind, Sequence};
