//! # Pomoflow Core Library
//!
//! This library provides the core business logic for the Pomoflow Pomodoro
//! timer. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary, with any GUI being a thin layer
//! over the same core library.
//!
//! ## Architecture
//!
//! - **Session Engine**: A tick-driven state machine that requires the
//!   caller to invoke `tick()` about once per second
//! - **Storage**: SQLite-based cycle log and TOML-based configuration
//! - **Stats**: Hourly and daily productivity aggregates over logged cycles
//! - **Control**: Traits for external collaborators (music service,
//!   notifications)
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Core timer state machine
//! - [`CycleLog`]: Persistence for completed cycles
//! - [`Config`]: Application configuration management
//! - [`MusicControl`]: Trait for external music services

pub mod control;
pub mod error;
pub mod events;
pub mod history;
pub mod stats;
pub mod storage;
pub mod timer;

pub use control::{MusicControl, Notifier, NullMusic};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use history::CycleLog;
pub use stats::{daily_report, hourly_report, DailyBucket, HourlyBucket};
pub use storage::{Config, CycleRecord, Database};
pub use timer::{
    Continuity, Cycle, Interval, IntervalKind, Sequence, SessionEngine, SessionState,
};
