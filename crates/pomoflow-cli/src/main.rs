use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pomoflow-cli", version, about = "Pomoflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Productivity statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Cycle log queries
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Manual music service control
    Music {
        #[command(subcommand)]
        action: commands::music::MusicAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::Music { action } => commands::music::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
