//! Statistics module for Pomoflow
//!
//! Aggregates logged cycles into hourly and daily productivity reports
//! for visualization scaling.

mod productivity;

pub use productivity::{daily_report, hourly_report, DailyBucket, HourlyBucket};
