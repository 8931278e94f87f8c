//! Traits for external collaborators.
//!
//! The engine never performs side effects itself. Callers dispatch
//! fire-and-forget commands to these traits off the emitted events; a
//! failed command is reported and dropped, never fed back into engine
//! state.

use crate::timer::IntervalKind;

/// Control surface of an external music service.
///
/// The connection handshake happens outside this crate -- an implementor
/// is assumed to already hold whatever session it needs.
pub trait MusicControl {
    /// Unique identifier (e.g. "spotify").
    fn name(&self) -> &str;

    /// Request playback of a track.
    fn play(&self, track_id: &str) -> Result<(), Box<dyn std::error::Error>>;

    /// Pause playback.
    fn pause(&self) -> Result<(), Box<dyn std::error::Error>>;

    /// Refresh the service session (token, device list, ...).
    fn refresh(&self) -> Result<(), Box<dyn std::error::Error>>;

    /// Tear down the connection.
    fn disconnect(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}

/// No-op implementation used when no music service is configured.
pub struct NullMusic;

impl MusicControl for NullMusic {
    fn name(&self) -> &str {
        "none"
    }

    fn play(&self, _track_id: &str) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn pause(&self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn refresh(&self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}

/// Notification trigger, fired on interval completion.
pub trait Notifier {
    fn interval_completed(
        &self,
        _kind: IntervalKind,
        _elapsed_secs: u64,
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(()) // default no-op
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_music_never_fails() {
        let mut music = NullMusic;
        assert!(music.play("track-1").is_ok());
        assert!(music.pause().is_ok());
        assert!(music.refresh().is_ok());
        assert!(music.disconnect().is_ok());
    }
}
