use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Subcommand;
use pomoflow_core::storage::Database;
use pomoflow_core::CycleLog;

#[derive(Subcommand)]
pub enum LogAction {
    /// List logged cycles in a date range (defaults to the last 7 days)
    List {
        /// Start date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// End date, exclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let log = CycleLog::new(&db);

    match action {
        LogAction::List { from, to } => {
            let now = Utc::now();
            let from = match from {
                Some(d) => Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)),
                None => now - Duration::days(7),
            };
            let to = match to {
                Some(d) => Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)),
                None => now,
            };
            let records = log.between(from, to)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
