//! Core game logic for the color-sequence game
//!
//! This module contains the sequence engine and the game state machine without
//! any I/O, timers or rendering. Timed behaviour is described by the
//! directives the controller returns and executed by [`crate::session`].

pub mod config;
pub mod controller;
pub mod error;
pub mod sequence;
pub mod state;
pub mod symbol;

// Re-export commonly used types
pub use config::GameConfig;
pub use controller::{Directive, GameController, InputOutcome};
pub use error::{ConfigError, SequenceMismatch};
pub use sequence::{PlaybackPlan, PlaybackStep, SequenceEngine};
pub use state::{GameOverNotice, GameState, RoundToken, Snapshot};
pub use symbol::Symbol;
