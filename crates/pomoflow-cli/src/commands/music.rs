use clap::Subcommand;
use pomoflow_core::Config;

use super::timer::music_for;

#[derive(Subcommand)]
pub enum MusicAction {
    /// Request playback of a track on the configured service
    Play {
        /// Service-specific track id (defaults to music.track_id)
        track_id: Option<String>,
    },
    /// Pause playback
    Pause,
    /// Refresh the service session
    Refresh,
    /// Tear down the service connection
    Disconnect,
}

pub fn run(action: MusicAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let mut music = music_for(&config);

    match action {
        MusicAction::Play { track_id } => {
            let track = track_id
                .or_else(|| config.music.track_id.clone())
                .unwrap_or_default();
            music.play(&track)?;
        }
        MusicAction::Pause => music.pause()?,
        MusicAction::Refresh => music.refresh()?,
        MusicAction::Disconnect => music.disconnect()?,
    }
    Ok(())
}
