use thiserror::Error;

use super::symbol::Symbol;

/// The player's input at `index` differs from the generated sequence.
///
/// This is the only way a game can end. It is a normal game event, not a
/// fault: the controller handles it by moving to `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected} at position {index}, got {actual}")]
pub struct SequenceMismatch {
    pub index: usize,
    pub expected: Symbol,
    pub actual: Symbol,
}

/// Rejected game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    ZeroDuration { field: &'static str },

    #[error("highlight_ms ({highlight_ms}) cannot exceed sequence_delay_ms ({sequence_delay_ms})")]
    HighlightExceedsDelay {
        highlight_ms: u64,
        sequence_delay_ms: u64,
    },

    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file")]
    Parse(#[from] serde_json::Error),
}
