use chrono::{Duration, Utc};
use clap::Subcommand;
use pomoflow_core::storage::Database;
use pomoflow_core::{daily_report, hourly_report, CycleLog, IntervalKind};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Mean elapsed seconds per hour of day
    Hourly {
        /// Restrict to one interval kind (activity, short-break, long-break)
        #[arg(long)]
        kind: Option<String>,
        /// How many days back to aggregate
        #[arg(long, default_value = "30")]
        days: i64,
    },
    /// Total elapsed seconds per calendar day
    Daily {
        #[arg(long)]
        kind: Option<String>,
        #[arg(long, default_value = "30")]
        days: i64,
    },
}

fn parse_kind(kind: Option<String>) -> Result<Option<IntervalKind>, Box<dyn std::error::Error>> {
    kind.map(|k| k.parse::<IntervalKind>())
        .transpose()
        .map_err(Into::into)
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let log = CycleLog::new(&db);
    let now = Utc::now();

    match action {
        StatsAction::Hourly { kind, days } => {
            let kind = parse_kind(kind)?;
            let cycles = log.between(now - Duration::days(days), now)?;
            let report = hourly_report(&cycles, kind);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StatsAction::Daily { kind, days } => {
            let kind = parse_kind(kind)?;
            let cycles = log.between(now - Duration::days(days), now)?;
            let report = daily_report(&cycles, kind);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
