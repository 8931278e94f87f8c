pub mod config;
pub mod log;
pub mod music;
pub mod stats;
pub mod timer;
