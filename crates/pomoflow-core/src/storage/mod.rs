mod config;
pub mod database;

pub use config::Config;
pub use database::{CycleRecord, Database};

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns `~/.config/pomoflow[-dev]/` based on POMOFLOW_ENV.
///
/// Set POMOFLOW_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomoflow-dev")
    } else {
        base_dir.join("pomoflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
