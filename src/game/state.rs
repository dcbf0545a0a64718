use super::symbol::Symbol;

/// Phase of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    /// No game started yet
    #[default]
    Idle,
    /// The sequence is being played back; input is ignored
    Watching,
    /// Waiting for the player to replay the sequence
    Playing,
    /// The player made a mistake
    GameOver,
}

impl GameState {
    /// A new game may only be started from these states
    pub fn can_start(&self) -> bool {
        matches!(self, GameState::Idle | GameState::GameOver)
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameState::Idle => "Ready",
            GameState::Watching => "Watch",
            GameState::Playing => "Your turn",
            GameState::GameOver => "Game over",
        }
    }
}

/// Identifies the round a timed continuation was issued for.
///
/// A fresh token is minted every time a playback starts and every time a
/// round pause starts, so a continuation carrying an older token belongs to a
/// phase that no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RoundToken(pub u64);

impl RoundToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Result of a finished game, handed to the notification collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverNotice {
    pub final_score: u32,
    /// High score after this game was taken into account
    pub high_score: u32,
}

/// Everything a presentation layer needs to draw the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub state: GameState,
    pub score: u32,
    pub high_score: u32,
    /// Pad currently lit, if any
    pub active_symbol: Option<Symbol>,
    pub sequence_len: usize,
    /// Symbols replayed so far this round
    pub progress: usize,
}

impl Snapshot {
    /// Whether the presentation should forward symbol input
    pub fn accepts_input(&self) -> bool {
        self.state == GameState::Playing
    }
}
