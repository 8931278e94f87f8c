//! Hourly and daily aggregation over logged cycles.
//!
//! Buckets are keyed by the cycle's start timestamp. Each report carries
//! a `pct_of_max` per bucket (bucket value over the maximum bucket value,
//! 0-100) so a chart can scale bars without recomputing.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::storage::CycleRecord;
use crate::timer::IntervalKind;

/// One hour-of-day bucket (0-23).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub hour: u8,
    pub cycle_count: u64,
    pub mean_elapsed_secs: f64,
    pub pct_of_max: f64,
}

/// One calendar-day bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBucket {
    pub day: NaiveDate,
    pub cycle_count: u64,
    pub total_elapsed_secs: u64,
    pub pct_of_max: f64,
}

/// Mean elapsed seconds per hour of day, always 24 buckets.
pub fn hourly_report(cycles: &[CycleRecord], kind: Option<IntervalKind>) -> Vec<HourlyBucket> {
    let mut counts = [0u64; 24];
    let mut totals = [0u64; 24];
    for cycle in filtered(cycles, kind) {
        let hour = cycle.started_at.hour() as usize;
        counts[hour] += 1;
        totals[hour] += cycle.elapsed_secs;
    }

    let mut buckets: Vec<HourlyBucket> = (0..24)
        .map(|hour| HourlyBucket {
            hour: hour as u8,
            cycle_count: counts[hour],
            mean_elapsed_secs: if counts[hour] == 0 {
                0.0
            } else {
                totals[hour] as f64 / counts[hour] as f64
            },
            pct_of_max: 0.0,
        })
        .collect();

    let max = buckets
        .iter()
        .map(|b| b.mean_elapsed_secs)
        .fold(0.0f64, f64::max);
    for bucket in &mut buckets {
        bucket.pct_of_max = pct_of(bucket.mean_elapsed_secs, max);
    }
    buckets
}

/// Total elapsed seconds per calendar day, oldest first. Days with no
/// logged cycles are absent.
pub fn daily_report(cycles: &[CycleRecord], kind: Option<IntervalKind>) -> Vec<DailyBucket> {
    let mut days: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for cycle in filtered(cycles, kind) {
        let entry = days.entry(cycle.started_at.date_naive()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += cycle.elapsed_secs;
    }

    let max = days.values().map(|(_, total)| *total).max().unwrap_or(0) as f64;
    days.into_iter()
        .map(|(day, (count, total))| DailyBucket {
            day,
            cycle_count: count,
            total_elapsed_secs: total,
            pct_of_max: pct_of(total as f64, max),
        })
        .collect()
}

fn filtered<'a>(
    cycles: &'a [CycleRecord],
    kind: Option<IntervalKind>,
) -> impl Iterator<Item = &'a CycleRecord> {
    cycles
        .iter()
        .filter(move |c| kind.map_or(true, |k| c.kind == k))
}

fn pct_of(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        (value / max * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};

    fn record(kind: IntervalKind, started: &str, elapsed_secs: u64) -> CycleRecord {
        let started_at = NaiveDateTime::parse_from_str(started, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc();
        CycleRecord {
            id: 0,
            kind,
            duration_secs: elapsed_secs,
            started_at,
            ended_at: started_at + Duration::seconds(elapsed_secs as i64),
            elapsed_secs,
        }
    }

    fn fixture() -> Vec<CycleRecord> {
        vec![
            record(IntervalKind::Activity, "2026-03-02 09:05:00", 1500),
            record(IntervalKind::Activity, "2026-03-02 09:40:00", 500),
            record(IntervalKind::ShortBreak, "2026-03-02 10:00:00", 300),
            record(IntervalKind::Activity, "2026-03-03 14:00:00", 1000),
        ]
    }

    #[test]
    fn hourly_means_and_normalization() {
        let buckets = hourly_report(&fixture(), Some(IntervalKind::Activity));
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[9].cycle_count, 2);
        assert_eq!(buckets[9].mean_elapsed_secs, 1000.0);
        assert_eq!(buckets[14].mean_elapsed_secs, 1000.0);
        // Break cycle filtered out.
        assert_eq!(buckets[10].cycle_count, 0);
        // Both non-empty buckets share the maximum.
        assert_eq!(buckets[9].pct_of_max, 100.0);
        assert_eq!(buckets[14].pct_of_max, 100.0);
        assert_eq!(buckets[0].pct_of_max, 0.0);
    }

    #[test]
    fn hourly_unfiltered_includes_breaks() {
        let buckets = hourly_report(&fixture(), None);
        assert_eq!(buckets[10].cycle_count, 1);
        assert_eq!(buckets[10].mean_elapsed_secs, 300.0);
    }

    #[test]
    fn daily_totals_and_normalization() {
        let buckets = daily_report(&fixture(), Some(IntervalKind::Activity));
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].day.to_string(), "2026-03-02");
        assert_eq!(buckets[0].total_elapsed_secs, 2000);
        assert_eq!(buckets[0].cycle_count, 2);
        assert_eq!(buckets[0].pct_of_max, 100.0);
        assert_eq!(buckets[1].total_elapsed_secs, 1000);
        assert_eq!(buckets[1].pct_of_max, 50.0);
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let hourly = hourly_report(&[], None);
        assert!(hourly.iter().all(|b| b.pct_of_max == 0.0 && b.cycle_count == 0));
        assert!(daily_report(&[], None).is_empty());
    }
}
