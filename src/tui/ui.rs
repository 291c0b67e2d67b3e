//! Stateless screen layout.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use winliam_games::{Actor, BoardView, BoardWidget, SessionContext};

const HELP: &str = "1-9 move  c create  j join  l leave  n new local game  q quit";

/// Everything the screen shows.
pub struct Screen<'a> {
    /// Who is playing.
    pub actor: &'a Actor,
    /// Session identity.
    pub context: &'a SessionContext,
    /// Board to draw.
    pub view: &'a BoardView,
    /// Most recent notices, oldest first.
    pub notices: &'a [String],
    /// Join prompt buffer while it is open.
    pub prompt: Option<&'a str>,
}

/// Draws one frame.
pub fn draw(frame: &mut Frame, screen: &Screen<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title
            Constraint::Min(12),    // Board
            Constraint::Length(6),  // Notices
            Constraint::Length(1),  // Help / prompt
        ])
        .split(frame.area());

    let session = match (screen.context.session_id(), screen.context.side()) {
        (Some(id), Some(side)) => format!("session {} as {} ({})", id, side, screen.context.phase()),
        _ => "local board".to_string(),
    };
    let title = Paragraph::new(format!("Tic-tac-toe - {} - {}", screen.actor, session))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    frame.render_widget(BoardWidget::new(screen.view), chunks[1]);

    let lines: Vec<Line> = screen.notices.iter().map(|n| Line::from(n.as_str())).collect();
    let notices = Paragraph::new(lines)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Notices"));
    frame.render_widget(notices, chunks[2]);

    let footer = match screen.prompt {
        Some(buffer) => Paragraph::new(format!("Join session: {}_", buffer))
            .style(Style::default().fg(Color::Green)),
        None => Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer.alignment(Alignment::Center), chunks[3]);
}
