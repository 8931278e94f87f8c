use clap::Subcommand;
use pomoflow_core::storage::Database;
use pomoflow_core::{
    Config, CycleLog, Event, IntervalKind, MusicControl, Notifier, NullMusic, SessionEngine,
};

const ENGINE_KEY: &str = "session_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the current interval
    Play,
    /// Pause the running interval
    Pause,
    /// Advance the clock by one second (the external tick source)
    Tick,
    /// Skip to the next interval
    Skip,
    /// Reset to the first interval
    Reset,
    /// Print current timer state as JSON
    Status,
}

fn load_engine(db: &Database, config: &Config) -> SessionEngine {
    let mut engine = db
        .kv_get(ENGINE_KEY)
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str::<SessionEngine>(&json).ok())
        .unwrap_or_else(|| SessionEngine::new(config.sequence(), config.continuity));

    // Settings may have changed since the engine was persisted.
    let planned = config.sequence();
    if engine.sequence() != &planned || engine.continuity() != config.continuity {
        engine.apply_plan(planned, config.continuity);
    }
    engine
}

fn save_engine(db: &Database, engine: &SessionEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Prints a notification line to stderr, keeping stdout for event JSON.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn interval_completed(
        &self,
        kind: IntervalKind,
        elapsed_secs: u64,
    ) -> Result<(), Box<dyn std::error::Error>> {
        eprintln!(
            "{}",
            serde_json::json!({
                "type": "notification",
                "kind": kind.as_str(),
                "elapsed_secs": elapsed_secs,
            })
        );
        Ok(())
    }
}

/// Echoes music commands to stderr for the configured service.
///
/// The actual service connection lives in the GUI shell; from the CLI the
/// commands are observable fire-and-forget lines.
struct EchoMusic {
    service: String,
}

impl EchoMusic {
    fn emit(&self, command: &str, track_id: Option<&str>) {
        eprintln!(
            "{}",
            serde_json::json!({
                "type": "music_command",
                "service": self.service,
                "command": command,
                "track_id": track_id,
            })
        );
    }
}

impl MusicControl for EchoMusic {
    fn name(&self) -> &str {
        &self.service
    }

    fn play(&self, track_id: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.emit("play", Some(track_id));
        Ok(())
    }

    fn pause(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.emit("pause", None);
        Ok(())
    }

    fn refresh(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.emit("refresh", None);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.emit("disconnect", None);
        Ok(())
    }
}

pub(crate) fn music_for(config: &Config) -> Box<dyn MusicControl> {
    match &config.music.service {
        Some(service) => Box::new(EchoMusic {
            service: service.clone(),
        }),
        None => Box::new(NullMusic),
    }
}

/// Steer the music service toward the interval kind now on deck.
fn steer_music(music: &dyn MusicControl, kind: IntervalKind, playing: bool, config: &Config) {
    let result = if kind == IntervalKind::Activity {
        if playing && config.music.autoplay_on_activity {
            let track = config.music.track_id.as_deref().unwrap_or_default();
            music.play(track)
        } else {
            Ok(())
        }
    } else if config.music.pause_on_break {
        music.pause()
    } else {
        Ok(())
    };
    if let Err(e) = result {
        eprintln!("music control error: {e}");
    }
}

/// Dispatch the fire-and-forget effects of an engine event.
fn dispatch(event: &Event, db: &Database, config: &Config) {
    if let Some(cycle) = event.retired_cycle() {
        if let Err(e) = CycleLog::new(db).record(cycle) {
            eprintln!("cycle log error: {e}");
        }
    }

    let music = music_for(config);
    match event {
        Event::SessionStarted { kind, .. } => {
            steer_music(music.as_ref(), *kind, true, config);
        }
        Event::SessionPaused { .. } => {
            if let Err(e) = music.pause() {
                eprintln!("music control error: {e}");
            }
        }
        Event::IntervalCompleted {
            cycle,
            next_kind,
            auto_played,
            ..
        } => {
            if config.notifications.enabled {
                if let Err(e) = StderrNotifier.interval_completed(cycle.kind, cycle.elapsed_secs) {
                    eprintln!("notification error: {e}");
                }
            }
            steer_music(music.as_ref(), *next_kind, *auto_played, config);
        }
        _ => {}
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load();
    let mut engine = load_engine(&db, &config);

    let event = match action {
        TimerAction::Play => engine.play(),
        TimerAction::Pause => engine.pause(),
        TimerAction::Tick => engine.tick(),
        TimerAction::Skip => engine.skip(),
        TimerAction::Reset => engine.reset(),
        TimerAction::Status => None,
    };

    match event {
        Some(event) => {
            println!("{}", serde_json::to_string_pretty(&event)?);
            dispatch(&event, &db, &config);
        }
        None => {
            let snapshot = engine.snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}
