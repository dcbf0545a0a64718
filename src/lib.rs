//! Simon Says - a color-sequence memory game
//!
//! This library provides:
//! - Core game logic: sequence generation and the turn state machine (game module)
//! - An async session that runs playbacks and round timers (session module)
//! - Sound output capability (sound module)
//! - TUI rendering, input mapping and the interactive mode (render, input, modes)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
pub mod sound;
