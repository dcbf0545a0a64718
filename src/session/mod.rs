//! Async driver for the game controller
//!
//! [`GameSession`] owns one [`GameController`] and executes the directives it
//! returns: playbacks run as tokio tasks, the round pause and input flashes
//! are one-shot timers, and all of them report back on a single channel. A
//! [`Snapshot`] is published after every mutation.

pub mod playback;

pub use playback::PlaybackTask;

use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::debug;

use crate::game::{
    Directive, GameController, GameOverNotice, InputOutcome, RoundToken, Snapshot, Symbol,
};
use crate::sound::{play_best_effort, SoundPlayer};

/// Timed continuation delivered back to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A playback step lit (`Some`) or cleared (`None`) a pad
    Highlight {
        token: RoundToken,
        symbol: Option<Symbol>,
    },
    PlaybackFinished { token: RoundToken },
    /// The pause after a completed round is over
    ExtendSequence { token: RoundToken },
    /// An input flash ran its course
    FlashEnded { id: u64 },
}

/// Receiving ends handed to the presentation layer
pub struct SessionHandles {
    pub snapshots: watch::Receiver<Snapshot>,
    pub notices: mpsc::UnboundedReceiver<GameOverNotice>,
}

pub struct GameSession<R = StdRng> {
    controller: GameController<R>,
    sound: Arc<dyn SoundPlayer>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    snapshots: watch::Sender<Snapshot>,
    notices: mpsc::UnboundedSender<GameOverNotice>,
    playback: Option<PlaybackTask>,
    active_symbol: Option<Symbol>,
    flash_id: u64,
}

impl<R: Rng> GameSession<R> {
    pub fn new(controller: GameController<R>, sound: Arc<dyn SoundPlayer>) -> (Self, SessionHandles) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(controller.snapshot(None));
        let (notices, notice_rx) = mpsc::unbounded_channel();

        let session = Self {
            controller,
            sound,
            events_tx,
            events_rx,
            snapshots,
            notices,
            playback: None,
            active_symbol: None,
            flash_id: 0,
        };
        let handles = SessionHandles {
            snapshots: snapshot_rx,
            notices: notice_rx,
        };

        (session, handles)
    }

    pub fn start_game(&mut self) {
        let directives = self.controller.start_game();
        if directives.is_empty() {
            return;
        }

        self.active_symbol = None;
        self.apply(directives);
        self.publish();
    }

    pub fn submit_input(&mut self, symbol: Symbol) -> InputOutcome {
        let (outcome, directives) = self.controller.submit_input(symbol);
        if outcome != InputOutcome::Ignored {
            self.apply(directives);
            self.publish();
        }
        outcome
    }

    /// Wait for the next timed continuation.
    ///
    /// The session keeps a sender of its own, so this only resolves when an
    /// event is actually delivered. Cancel-safe, for use in `select!`.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        let round = self.controller.round();

        match event {
            SessionEvent::Highlight { token, symbol } => {
                if token != round {
                    return;
                }
                self.active_symbol = symbol;
            }
            SessionEvent::PlaybackFinished { token } => {
                if self.playback.as_ref().is_some_and(|p| p.token() == token) {
                    self.playback = None;
                }
                let directives = self.controller.playback_finished(token);
                self.apply(directives);
            }
            SessionEvent::ExtendSequence { token } => {
                let directives = self.controller.extend_sequence(token);
                self.apply(directives);
            }
            SessionEvent::FlashEnded { id } => {
                if id != self.flash_id {
                    return;
                }
                self.active_symbol = None;
            }
        }

        self.publish();
    }

    pub fn snapshot(&self) -> Snapshot {
        self.controller.snapshot(self.active_symbol)
    }

    pub fn controller(&self) -> &GameController<R> {
        &self.controller
    }

    fn apply(&mut self, directives: Vec<Directive>) {
        for directive in directives {
            match directive {
                Directive::StartPlayback { token, plan } => {
                    if let Some(previous) = self.playback.take() {
                        debug!(token = ?previous.token(), "aborting previous playback");
                        previous.abort();
                    }
                    // Pending flash timers must not clear a playback highlight
                    self.flash_id += 1;
                    self.active_symbol = None;
                    self.playback = Some(PlaybackTask::spawn(
                        token,
                        plan,
                        Arc::clone(&self.sound),
                        self.events_tx.clone(),
                    ));
                }
                Directive::ScheduleExtension { token, delay } => {
                    self.send_after(delay, SessionEvent::ExtendSequence { token });
                }
                Directive::PlaySound(id) => {
                    play_best_effort(self.sound.as_ref(), id);
                }
                Directive::Flash { symbol, duration } => {
                    self.flash_id += 1;
                    self.active_symbol = Some(symbol);
                    self.send_after(duration, SessionEvent::FlashEnded { id: self.flash_id });
                }
                Directive::NotifyGameOver(notice) => {
                    if self.notices.send(notice).is_err() {
                        debug!("no listener for game over notice");
                    }
                }
            }
        }
    }

    fn send_after(&self, delay: Duration, event: SessionEvent) {
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = events.send(event);
        });
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameState};
    use crate::sound::{SoundError, SoundId};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Records every sound and optionally fails each call
    #[derive(Default)]
    struct RecordingSound {
        played: Mutex<Vec<SoundId>>,
        fail: bool,
    }

    impl RecordingSound {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn played(&self) -> Vec<SoundId> {
            self.played.lock().unwrap().clone()
        }
    }

    impl SoundPlayer for RecordingSound {
        fn play(&self, id: SoundId) -> Result<(), SoundError> {
            self.played.lock().unwrap().push(id);
            if self.fail {
                return Err(SoundError::Unavailable("no device".to_string()));
            }
            Ok(())
        }
    }

    fn session_with(sound: Arc<RecordingSound>) -> (GameSession, SessionHandles) {
        GameSession::new(GameController::seeded(GameConfig::default(), 9), sound)
    }

    async fn pump_until(session: &mut GameSession, state: GameState) {
        while session.controller().state() != state {
            let event = session.next_event().await.unwrap();
            session.handle_event(event);
        }
    }

    fn play_round(session: &mut GameSession) {
        let sequence = session.controller().sequence().to_vec();
        for symbol in sequence {
            session.submit_input(symbol);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_opens_input() {
        let sound = Arc::new(RecordingSound::default());
        let (mut session, handles) = session_with(sound.clone());

        session.start_game();
        assert_eq!(handles.snapshots.borrow().state, GameState::Watching);

        // Input during playback is dropped, not queued
        let first = session.controller().sequence()[0];
        assert_eq!(session.submit_input(first), InputOutcome::Ignored);

        let event = session.next_event().await.unwrap();
        session.handle_event(event);
        assert_eq!(handles.snapshots.borrow().active_symbol, Some(first));

        pump_until(&mut session, GameState::Playing).await;
        let snapshot = *handles.snapshots.borrow();
        assert_eq!(snapshot.state, GameState::Playing);
        assert_eq!(snapshot.active_symbol, None);
        assert_eq!(snapshot.progress, 0);
        assert_eq!(sound.played(), vec![SoundId::Tone(first)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_pause_then_longer_playback() {
        let sound = Arc::new(RecordingSound::default());
        let (mut session, handles) = session_with(sound);

        session.start_game();
        pump_until(&mut session, GameState::Playing).await;

        play_round(&mut session);
        assert_eq!(session.controller().score(), 1);
        assert_eq!(handles.snapshots.borrow().state, GameState::Watching);
        assert_eq!(session.controller().sequence().len(), 1);

        let completed_at = Instant::now();
        while session.controller().sequence().len() == 1 {
            let event = session.next_event().await.unwrap();
            session.handle_event(event);
        }
        assert!(completed_at.elapsed() >= Duration::from_millis(1000));
        assert_eq!(session.controller().sequence().len(), 2);
        assert_eq!(session.controller().state(), GameState::Watching);

        pump_until(&mut session, GameState::Playing).await;
        assert!(session.controller().player_buffer().is_empty());
        assert_eq!(handles.snapshots.borrow().score, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mismatch_sends_notice() {
        let sound = Arc::new(RecordingSound::default());
        let (mut session, mut handles) = session_with(sound.clone());

        session.start_game();
        pump_until(&mut session, GameState::Playing).await;

        let expected = session.controller().sequence()[0];
        let wrong = Symbol::from_index((expected.index() + 2) % 4).unwrap();
        let outcome = session.submit_input(wrong);
        assert!(matches!(outcome, InputOutcome::GameOver { .. }));

        let notice = handles.notices.recv().await.unwrap();
        assert_eq!(
            notice,
            GameOverNotice {
                final_score: 0,
                high_score: 0
            }
        );
        assert_eq!(handles.snapshots.borrow().state, GameState::GameOver);
        assert_eq!(sound.played().last(), Some(&SoundId::Error));

        // Try again
        session.start_game();
        assert_eq!(handles.snapshots.borrow().state, GameState::Watching);
        assert_eq!(handles.snapshots.borrow().score, 0);
        assert_eq!(handles.snapshots.borrow().sequence_len, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_sound_does_not_block_game() {
        let sound = Arc::new(RecordingSound::failing());
        let (mut session, handles) = session_with(sound.clone());

        session.start_game();
        pump_until(&mut session, GameState::Playing).await;
        play_round(&mut session);
        pump_until(&mut session, GameState::Playing).await;

        assert_eq!(handles.snapshots.borrow().score, 1);
        assert_eq!(session.controller().sequence().len(), 2);
        assert!(!sound.played().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_flash_clears() {
        let sound = Arc::new(RecordingSound::default());
        let (mut session, handles) = session_with(sound);

        session.start_game();
        pump_until(&mut session, GameState::Playing).await;
        play_round(&mut session);

        let pressed = session.controller().sequence()[0];
        assert_eq!(handles.snapshots.borrow().active_symbol, Some(pressed));

        // Flash (250ms) ends before the round pause (1000ms)
        let event = session.next_event().await.unwrap();
        assert!(matches!(event, SessionEvent::FlashEnded { .. }));
        session.handle_event(event);
        assert_eq!(handles.snapshots.borrow().active_symbol, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_continuations_do_not_skip_phases() {
        let sound = Arc::new(RecordingSound::default());
        let (mut session, handles) = session_with(sound);

        session.start_game();
        let playback = session.controller().round();

        // Extension delivered mid-playback does not grow the sequence
        session.handle_event(SessionEvent::ExtendSequence { token: playback });
        assert_eq!(session.controller().sequence().len(), 1);

        pump_until(&mut session, GameState::Playing).await;
        play_round(&mut session);

        // Playback completion delivered during the round pause keeps watching
        session.handle_event(SessionEvent::PlaybackFinished { token: playback });
        assert_eq!(handles.snapshots.borrow().state, GameState::Watching);
        assert_eq!(session.controller().sequence().len(), 1);

        while session.controller().sequence().len() == 1 {
            let event = session.next_event().await.unwrap();
            session.handle_event(event);
        }
        pump_until(&mut session, GameState::Playing).await;
        assert_eq!(handles.snapshots.borrow().sequence_len, 2);
    }
}
