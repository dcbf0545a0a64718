use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Press(Symbol),
    /// Start a game, or try again after a game over
    Start,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Pads - arrow keys follow the on-screen layout
            KeyCode::Up => KeyAction::Press(Symbol::Green),
            KeyCode::Right => KeyAction::Press(Symbol::Red),
            KeyCode::Left => KeyAction::Press(Symbol::Yellow),
            KeyCode::Down => KeyAction::Press(Symbol::Blue),

            // Pads - number keys
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                Symbol::from_index(index)
                    .map(KeyAction::Press)
                    .unwrap_or(KeyAction::None)
            }

            // Pads - color initials
            KeyCode::Char('g') | KeyCode::Char('G') => KeyAction::Press(Symbol::Green),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Press(Symbol::Red),
            KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Press(Symbol::Yellow),
            KeyCode::Char('b') | KeyCode::Char('B') => KeyAction::Press(Symbol::Blue),

            // Controls
            KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Start,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
