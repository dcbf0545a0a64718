use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameOverNotice, GameState, Snapshot, Symbol};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        notice: Option<&GameOverNotice>,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Pads
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the board horizontally
        let board_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(15),
                Constraint::Percentage(70),
                Constraint::Percentage(15),
            ])
            .split(chunks[1])[1];

        match (snapshot.state, notice) {
            (GameState::Idle, _) => {
                frame.render_widget(self.render_welcome(), board_area);
            }
            (GameState::GameOver, Some(notice)) => {
                frame.render_widget(self.render_game_over(notice), board_area);
            }
            _ => self.render_board(frame, board_area, snapshot),
        }

        let controls = self.render_controls(snapshot.state);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
        let title = match snapshot.state {
            GameState::Playing => format!(
                " Your turn  {}/{} ",
                snapshot.progress, snapshot.sequence_len
            ),
            state => format!(" {} ", state.label()),
        };
        let border = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::White))
            .title(title)
            .title_alignment(Alignment::Center);
        let inner = border.inner(area);
        frame.render_widget(border, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        for (row, row_area) in rows.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row_area);

            for (col, cell) in cells.iter().enumerate() {
                if let Some(symbol) = Symbol::from_index(row * 2 + col) {
                    let lit = snapshot.active_symbol == Some(symbol);
                    frame.render_widget(self.render_pad(symbol, lit), *cell);
                }
            }
        }
    }

    fn render_pad(&self, symbol: Symbol, lit: bool) -> Paragraph<'static> {
        let (dim, bright) = pad_colors(symbol);
        let style = if lit {
            Style::default()
                .bg(bright)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(dim).fg(Color::Gray)
        };

        let label = format!("{} {}", symbol.index() + 1, symbol.name().to_uppercase());
        Paragraph::new(vec![Line::from(""), Line::from(label)])
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Games: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_welcome(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SIMON SAYS",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("Watch the pads light up, then repeat the sequence."),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
    }

    fn render_game_over(&self, notice: &GameOverNotice) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    notice.final_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    notice.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to try again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, state: GameState) -> Paragraph<'_> {
        let hint = match state {
            GameState::Watching => Span::styled("watch...", Style::default().fg(Color::Gray)),
            _ => Span::styled("↑→←↓ / 1-4 / GRYB", Style::default().fg(Color::Cyan)),
        };
        let text = vec![Line::from(vec![
            hint,
            Span::raw(" to press | "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(" to start | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// (unlit, lit) background for a pad
fn pad_colors(symbol: Symbol) -> (Color, Color) {
    match symbol {
        Symbol::Green => (Color::Rgb(0, 70, 0), Color::LightGreen),
        Symbol::Red => (Color::Rgb(80, 0, 0), Color::LightRed),
        Symbol::Yellow => (Color::Rgb(80, 70, 0), Color::LightYellow),
        Symbol::Blue => (Color::Rgb(0, 0, 90), Color::LightBlue),
    }
}
