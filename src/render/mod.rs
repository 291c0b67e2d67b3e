//! Projection of a snapshot onto a 3x3 display.

mod widget;

pub use widget::BoardWidget;

use winliam_tictactoe::{GameState, LOCAL_SESSION_ID, Mark, Outcome};

/// What the board display shows: nine cell labels and a status line.
///
/// Pure function of a snapshot and the local side; equal inputs give
/// equal views, which is what lets callers skip redundant renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    cells: [String; 9],
    marks: [Option<Mark>; 9],
    status: String,
}

impl BoardView {
    /// Projects `state` as seen by a client playing `side` (`None` offline).
    pub fn project(state: &GameState, side: Option<Mark>) -> Self {
        let marks: [Option<Mark>; 9] = std::array::from_fn(|pos| {
            state.board().get(pos).and_then(|square| square.mark())
        });
        let cells = std::array::from_fn(|pos| match marks[pos] {
            Some(mark) => mark.to_string(),
            None => (pos + 1).to_string(),
        });
        Self {
            cells,
            marks,
            status: status_line(state, side),
        }
    }

    /// Cell labels in row-major order: the mark, or the 1-based cell number when empty.
    pub fn cells(&self) -> &[String; 9] {
        &self.cells
    }

    /// Mark on cell `pos`, if any.
    pub fn mark(&self, pos: usize) -> Option<Mark> {
        self.marks.get(pos).copied().flatten()
    }

    /// Status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Plain-text rendering: the grid, a blank line, the status line.
    pub fn to_text(&self) -> String {
        let rows: Vec<String> = self
            .cells
            .chunks(3)
            .map(|row| format!(" {} | {} | {} ", row[0], row[1], row[2]))
            .collect();
        format!("{}\n\n{}", rows.join("\n---+---+---\n"), self.status)
    }
}

fn status_line(state: &GameState, side: Option<Mark>) -> String {
    let turn = state.turn();
    match (state.winner(), side) {
        (Some(Outcome::Tie), _) => "Tie game".to_string(),
        (Some(Outcome::Winner(mark)), Some(side)) if mark == side => "You win!".to_string(),
        (Some(Outcome::Winner(mark)), Some(_)) => format!("{} wins. You lose.", mark),
        (Some(Outcome::Winner(mark)), None) => format!("{} wins!", mark),
        (None, Some(side)) if state.players().get(side.opponent()).is_none() => {
            format!("Session {}: waiting for an opponent", state.id())
        }
        (None, Some(side)) if turn == side => format!("Your turn ({})", side),
        (None, Some(_)) => format!("Waiting for {}", turn),
        (None, None) if state.id() == LOCAL_SESSION_ID => format!("Local game: {} to move", turn),
        (None, None) => format!("{} to move", turn),
    }
}

/// Receives a fresh view whenever the displayed state changes.
pub trait Renderer {
    /// Shows `view`.
    fn render(&mut self, view: &BoardView);
}

/// Keeps the latest view for whoever draws it, counting renders.
#[derive(Debug, Clone, Default)]
pub struct RetainedView {
    view: Option<BoardView>,
    renders: usize,
}

impl RetainedView {
    /// Latest view, once anything has been rendered.
    pub fn view(&self) -> Option<&BoardView> {
        self.view.as_ref()
    }

    /// Number of renders received.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl Renderer for RetainedView {
    fn render(&mut self, view: &BoardView) {
        self.view = Some(view.clone());
        self.renders += 1;
    }
}

impl Default for BoardView {
    fn default() -> Self {
        Self::project(&GameState::local(), None)
    }
}
