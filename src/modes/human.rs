use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::interval;

use crate::game::{GameController, GameOverNotice, Snapshot};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::session::GameSession;
use crate::sound::SoundPlayer;

/// Interactive terminal game
pub struct HumanMode {
    session: GameSession,
    snapshots: watch::Receiver<Snapshot>,
    notices: mpsc::UnboundedReceiver<GameOverNotice>,
    last_notice: Option<GameOverNotice>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(controller: GameController, sound: Arc<dyn SoundPlayer>) -> Self {
        let (session, handles) = GameSession::new(controller, sound);

        Self {
            session,
            snapshots: handles.snapshots,
            notices: handles.notices,
            last_notice: None,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Playback steps, round pauses and flashes
                Some(event) = self.session.next_event() => {
                    self.session.handle_event(event);
                }

                // Game over notices
                Some(notice) = self.notices.recv() => {
                    self.on_game_over(notice);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = *self.snapshots.borrow();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, self.last_notice.as_ref(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Press(symbol) => {
                    // Input is only forwarded while the view says it is our turn
                    if self.snapshots.borrow().accepts_input() {
                        self.session.submit_input(symbol);
                    }
                }
                KeyAction::Start => self.start_game(),
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn start_game(&mut self) {
        if !self.session.controller().state().can_start() {
            return;
        }

        self.session.start_game();
        self.last_notice = None;
        self.metrics.on_game_start();
    }

    fn on_game_over(&mut self, notice: GameOverNotice) {
        self.metrics.on_game_over();
        self.last_notice = Some(notice);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }

    #[cfg(test)]
    fn state(&self) -> crate::game::GameState {
        self.snapshots.borrow().state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameState};
    use crate::sound::SilentPlayer;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> HumanMode {
        HumanMode::new(
            GameController::seeded(GameConfig::default(), 5),
            Arc::new(SilentPlayer),
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_starts_game() {
        let mut mode = mode();
        assert_eq!(mode.state(), GameState::Idle);

        mode.handle_event(key(KeyCode::Enter));
        assert_eq!(mode.state(), GameState::Watching);
        assert!(mode.metrics.elapsed_time.is_zero());

        // Presses while watching never reach the controller
        mode.handle_event(key(KeyCode::Char('1')));
        assert!(mode.session.controller().player_buffer().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_then_try_again() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));

        while mode.state() != GameState::Playing {
            let event = mode.session.next_event().await.unwrap();
            mode.session.handle_event(event);
        }

        let expected = mode.session.controller().sequence()[0];
        let wrong = (expected.index() + 1) % 4;
        let digit = char::from_digit(wrong as u32 + 1, 10).unwrap();
        mode.handle_event(key(KeyCode::Char(digit)));
        assert_eq!(mode.state(), GameState::GameOver);

        let notice = mode.notices.recv().await.unwrap();
        mode.on_game_over(notice);
        assert_eq!(mode.metrics.games_played, 1);
        assert!(mode.last_notice.is_some());

        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.state(), GameState::Watching);
        assert!(mode.last_notice.is_none());
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
