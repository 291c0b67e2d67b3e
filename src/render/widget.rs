//! Terminal drawing of a [`BoardView`].

use super::BoardView;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Paragraph, Widget},
};
use winliam_tictactoe::Mark;

const BOARD_WIDTH: u16 = 23;
const BOARD_HEIGHT: u16 = 11;

/// Draws the 3x3 grid centred in its area with the status line underneath.
#[derive(Debug, Clone, Copy)]
pub struct BoardWidget<'a> {
    view: &'a BoardView,
}

impl<'a> BoardWidget<'a> {
    /// Wraps `view` for drawing.
    pub fn new(view: &'a BoardView) -> Self {
        Self { view }
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [grid_area, status_area] = split(
            area,
            Direction::Vertical,
            [Constraint::Min(BOARD_HEIGHT), Constraint::Length(1)],
        );
        let grid = center_rect(grid_area, BOARD_WIDTH, BOARD_HEIGHT);
        let rows: [Rect; 5] = split(
            grid,
            Direction::Vertical,
            [
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
            ],
        );

        for (row, start) in [(rows[0], 0), (rows[2], 3), (rows[4], 6)] {
            self.render_row(row, start, buf);
        }
        for sep in [rows[1], rows[3]] {
            Paragraph::new("─".repeat(sep.width as usize))
                .style(Style::default().fg(Color::DarkGray))
                .render(sep, buf);
        }

        Paragraph::new(self.view.status())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .render(status_area, buf);
    }
}

impl BoardWidget<'_> {
    fn render_row(&self, area: Rect, start: usize, buf: &mut Buffer) {
        let cols: [Rect; 5] = split(
            area,
            Direction::Horizontal,
            [
                Constraint::Length(7),
                Constraint::Length(1),
                Constraint::Length(7),
                Constraint::Length(1),
                Constraint::Length(7),
            ],
        );
        for (i, col) in [cols[0], cols[2], cols[4]].into_iter().enumerate() {
            self.render_square(col, start + i, buf);
        }
        for sep in [cols[1], cols[3]] {
            Paragraph::new(vec![Line::from("│"); area.height as usize])
                .style(Style::default().fg(Color::DarkGray))
                .render(sep, buf);
        }
    }

    fn render_square(&self, area: Rect, pos: usize, buf: &mut Buffer) {
        let style = match self.view.mark(pos) {
            None => Style::default().fg(Color::DarkGray),
            Some(Mark::X) => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            Some(Mark::O) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        };
        let label = self.view.cells()[pos].as_str();
        Paragraph::new(vec![Line::default(), Line::from(label)])
            .style(style)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

fn split<const N: usize>(area: Rect, direction: Direction, constraints: [Constraint; N]) -> [Rect; N] {
    let chunks = Layout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area);
    std::array::from_fn(|i| chunks.get(i).copied().unwrap_or_default())
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [_, column, _] = split(
        area,
        Direction::Horizontal,
        [
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ],
    );
    let [_, centred, _] = split(
        column,
        Direction::Vertical,
        [
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ],
    );
    centred
}
