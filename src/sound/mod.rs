//! Sound capability
//!
//! The game never waits on sound. A [`SoundPlayer`] must return quickly, and
//! whatever error it reports is logged by the caller and otherwise ignored.

use std::io::Write;
use thiserror::Error;

use crate::game::Symbol;

/// Which sound to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    /// The tone belonging to a pad
    Tone(Symbol),
    /// Played when the player gets the sequence wrong
    Error,
}

#[derive(Debug, Error)]
pub enum SoundError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write to audio device")]
    Io(#[from] std::io::Error),
}

/// Best-effort, non-blocking sound output
pub trait SoundPlayer: Send + Sync {
    fn play(&self, id: SoundId) -> Result<(), SoundError>;
}

/// Play `id` and swallow any failure after logging it
pub fn play_best_effort(player: &dyn SoundPlayer, id: SoundId) {
    if let Err(err) = player.play(id) {
        tracing::warn!(?id, error = %err, "sound playback failed");
    }
}

/// Plays nothing; useful for muted sessions and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&self, id: SoundId) -> Result<(), SoundError> {
        tracing::trace!(?id, "sound muted");
        Ok(())
    }
}

/// Rings the terminal bell for the error sound.
///
/// Terminals have a single bell, so pad tones are left silent.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl SoundPlayer for TerminalBell {
    fn play(&self, id: SoundId) -> Result<(), SoundError> {
        if let SoundId::Error = id {
            let mut out = std::io::stderr();
            out.write_all(b"\x07")?;
            out.flush()?;
        }
        Ok(())
    }
}
