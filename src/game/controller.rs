use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

use super::{
    config::GameConfig,
    error::SequenceMismatch,
    sequence::{PlaybackPlan, SequenceEngine},
    state::{GameOverNotice, GameState, RoundToken, Snapshot},
    symbol::Symbol,
};
use crate::sound::SoundId;

/// Side effect the controller asks its driver to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Execute the plan, then report back with `playback_finished(token)`
    StartPlayback { token: RoundToken, plan: PlaybackPlan },
    /// Wait `delay`, then call `extend_sequence(token)`
    ScheduleExtension { token: RoundToken, delay: Duration },
    /// Fire-and-forget sound
    PlaySound(SoundId),
    /// Light a pad briefly in response to player input
    Flash { symbol: Symbol, duration: Duration },
    /// The game just ended
    NotifyGameOver(GameOverNotice),
}

/// What a call to [`GameController::submit_input`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Not accepting input right now; nothing changed
    Ignored,
    /// Correct so far, more symbols expected
    Accepted { progress: usize },
    /// The whole sequence was replayed
    RoundComplete { score: u32 },
    /// Wrong symbol; the game is over
    GameOver {
        mismatch: SequenceMismatch,
        notice: GameOverNotice,
    },
}

/// Timed continuation the controller is waiting for while `Watching`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    None,
    Playback,
    Extension,
}

/// The game state machine.
///
/// The controller never sleeps and performs no I/O. Every operation returns the
/// directives its driver must execute; timed directives come back as
/// `playback_finished` / `extend_sequence` calls carrying the round token they
/// were issued with.
pub struct GameController<R = StdRng> {
    config: GameConfig,
    engine: SequenceEngine<R>,
    state: GameState,
    score: u32,
    high_score: u32,
    player_buffer: Vec<Symbol>,
    round: RoundToken,
    awaiting: Continuation,
}

impl GameController<StdRng> {
    pub fn new(config: GameConfig) -> Self {
        let engine = SequenceEngine::new(&config);
        Self::with_engine(config, engine)
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        let engine = SequenceEngine::seeded(&config, seed);
        Self::with_engine(config, engine)
    }
}

impl<R: Rng> GameController<R> {
    pub fn with_engine(config: GameConfig, engine: SequenceEngine<R>) -> Self {
        Self {
            config,
            engine,
            state: GameState::Idle,
            score: 0,
            high_score: 0,
            player_buffer: Vec::new(),
            round: RoundToken::default(),
            awaiting: Continuation::None,
        }
    }

    /// Start a new game. Only valid from `Idle` or `GameOver`.
    pub fn start_game(&mut self) -> Vec<Directive> {
        if !self.state.can_start() {
            debug!(state = ?self.state, "start_game ignored");
            return Vec::new();
        }

        self.engine.reset();
        self.player_buffer.clear();
        self.score = 0;
        info!(high_score = self.high_score, "new game");

        self.set_state(GameState::Watching);
        self.append_symbol()
    }

    /// Playback for `token` has run to completion
    pub fn playback_finished(&mut self, token: RoundToken) -> Vec<Directive> {
        if !self.is_current(token, Continuation::Playback) {
            return Vec::new();
        }

        self.awaiting = Continuation::None;
        self.player_buffer.clear();
        self.set_state(GameState::Playing);
        Vec::new()
    }

    /// The pause after round `token` has elapsed; grow the sequence
    pub fn extend_sequence(&mut self, token: RoundToken) -> Vec<Directive> {
        if !self.is_current(token, Continuation::Extension) {
            return Vec::new();
        }

        self.append_symbol()
    }

    /// Validate one symbol of the player's replay
    pub fn submit_input(&mut self, symbol: Symbol) -> (InputOutcome, Vec<Directive>) {
        if self.state != GameState::Playing || self.player_buffer.len() >= self.engine.len() {
            debug!(state = ?self.state, %symbol, "input ignored");
            return (InputOutcome::Ignored, Vec::new());
        }

        let mut directives = vec![
            Directive::PlaySound(SoundId::Tone(symbol)),
            Directive::Flash {
                symbol,
                duration: self.config.input_flash(),
            },
        ];

        self.player_buffer.push(symbol);
        let index = self.player_buffer.len() - 1;
        let expected = self.engine.sequence()[index];

        if symbol != expected {
            let mismatch = SequenceMismatch {
                index,
                expected,
                actual: symbol,
            };
            let notice = self.end_game(&mismatch);
            directives.push(Directive::PlaySound(SoundId::Error));
            directives.push(Directive::NotifyGameOver(notice));
            return (InputOutcome::GameOver { mismatch, notice }, directives);
        }

        if self.player_buffer.len() == self.engine.len() {
            self.score += 1;
            debug!(score = self.score, "round complete");
            self.set_state(GameState::Watching);
            self.round = self.round.next();
            self.awaiting = Continuation::Extension;
            directives.push(Directive::ScheduleExtension {
                token: self.round,
                delay: self.config.round_pause(),
            });
            return (InputOutcome::RoundComplete { score: self.score }, directives);
        }

        (
            InputOutcome::Accepted {
                progress: self.player_buffer.len(),
            },
            directives,
        )
    }

    /// Build the presentation view. The active pad is view state owned by the caller.
    pub fn snapshot(&self, active_symbol: Option<Symbol>) -> Snapshot {
        Snapshot {
            state: self.state,
            score: self.score,
            high_score: self.high_score,
            active_symbol,
            sequence_len: self.engine.len(),
            progress: self.player_buffer.len(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn sequence(&self) -> &[Symbol] {
        self.engine.sequence()
    }

    pub fn player_buffer(&self) -> &[Symbol] {
        &self.player_buffer
    }

    pub fn round(&self) -> RoundToken {
        self.round
    }

    /// Appending to the sequence while watching is what starts a playback
    fn append_symbol(&mut self) -> Vec<Directive> {
        let symbol = self.engine.generate_next();
        debug!(%symbol, len = self.engine.len(), "sequence extended");

        if self.state != GameState::Watching {
            return Vec::new();
        }

        self.round = self.round.next();
        self.awaiting = Continuation::Playback;
        vec![Directive::StartPlayback {
            token: self.round,
            plan: self.engine.build_playback_plan(),
        }]
    }

    fn end_game(&mut self, mismatch: &SequenceMismatch) -> GameOverNotice {
        self.set_state(GameState::GameOver);
        self.awaiting = Continuation::None;
        if self.score > self.high_score {
            self.high_score = self.score;
        }

        info!(
            score = self.score,
            high_score = self.high_score,
            %mismatch,
            "game over"
        );

        GameOverNotice {
            final_score: self.score,
            high_score: self.high_score,
        }
    }

    /// Only the continuation last issued, for the phase it was issued for, is accepted
    fn is_current(&self, token: RoundToken, kind: Continuation) -> bool {
        if token != self.round || self.state != GameState::Watching || self.awaiting != kind {
            debug!(
                ?token,
                current = ?self.round,
                state = ?self.state,
                awaiting = ?self.awaiting,
                ?kind,
                "stale continuation dropped"
            );
            return false;
        }
        true
    }

    fn set_state(&mut self, state: GameState) {
        debug!(from = ?self.state, to = ?state, "transition");
        self.state = state;
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut SequenceEngine<R> {
        &mut self.engine
    }
}
