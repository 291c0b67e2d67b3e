//! Core domain types for tic-tac-toe snapshots.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a game session, assigned by the game service.
pub type SessionId = String;

/// Identifier used for the offline board.
pub const LOCAL_SESSION_ID: &str = "local";

/// A mark placed on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// Mark X (always moves first).
    X,
    /// Mark O (moves second).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark on this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Square {
    fn from(mark: Option<Mark>) -> Self {
        mark.map_or(Square::Empty, Square::Occupied)
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Number of squares on the board.
    pub const SIZE: usize = 9;

    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from squares in row-major order.
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<Square> {
        self.squares.get(pos).copied()
    }

    /// Checks if a square is empty. Out-of-range positions are never empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of occupied squares.
    pub fn filled(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// True if every mark on `earlier` is still in place on `self`.
    ///
    /// Squares only ever fill, so a later snapshot of the same game
    /// always satisfies this against an earlier one.
    pub fn extends(&self, earlier: &Board) -> bool {
        earlier
            .squares
            .iter()
            .zip(self.squares.iter())
            .all(|(before, after)| *before == Square::Empty || before == after)
    }

    /// Returns a copy of this board with `mark` placed at `pos`.
    pub(crate) fn with_mark(&self, pos: usize, mark: Mark) -> Self {
        let mut squares = self.squares;
        squares[pos] = Square::Occupied(mark);
        Self { squares }
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Outcome {
    /// Three in a row for this mark.
    #[display("{_0} wins")]
    Winner(Mark),
    /// Board filled without a line.
    #[display("tie")]
    Tie,
}

/// Who sits on which side of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Players {
    x: Option<String>,
    o: Option<String>,
}

impl Players {
    /// Creates a seating from optional participant names.
    pub fn new(x: Option<String>, o: Option<String>) -> Self {
        Self { x, o }
    }

    /// Returns the participant seated on `mark`, if assigned.
    pub fn get(&self, mark: Mark) -> Option<&str> {
        match mark {
            Mark::X => self.x.as_deref(),
            Mark::O => self.o.as_deref(),
        }
    }

    /// Returns the side `actor` is seated on, if any.
    pub fn side_of(&self, actor: &str) -> Option<Mark> {
        <Mark as strum::IntoEnumIterator>::iter().find(|mark| self.get(*mark) == Some(actor))
    }

    /// True once both sides are assigned.
    pub fn is_full(&self) -> bool {
        self.x.is_some() && self.o.is_some()
    }

    /// Seats `actor` on `mark`.
    pub fn seat(&mut self, mark: Mark, actor: impl Into<String>) {
        match mark {
            Mark::X => self.x = Some(actor.into()),
            Mark::O => self.o = Some(actor.into()),
        }
    }
}

/// Immutable snapshot of one match as seen by a client.
///
/// Snapshots are replaced wholesale on every update; a new one is
/// derived with [`crate::apply_move`] rather than mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    id: SessionId,
    board: Board,
    turn: Mark,
    players: Players,
    winner: Option<Outcome>,
}

impl GameState {
    /// Creates a snapshot from its parts.
    pub fn new(
        id: impl Into<SessionId>,
        board: Board,
        turn: Mark,
        players: Players,
        winner: Option<Outcome>,
    ) -> Self {
        Self {
            id: id.into(),
            board,
            turn,
            players,
            winner,
        }
    }

    /// Creates the empty snapshot of a fresh game: X to move, nobody seated.
    pub fn fresh(id: impl Into<SessionId>) -> Self {
        Self::new(id, Board::new(), Mark::X, Players::default(), None)
    }

    /// The empty offline board.
    pub fn local() -> Self {
        Self::fresh(LOCAL_SESSION_ID)
    }

    /// Returns the session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark to move next. Meaningless once terminal.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Returns the seating.
    pub fn players(&self) -> &Players {
        &self.players
    }

    /// Returns a copy of this snapshot with `actor` seated on `mark`.
    pub fn with_seat(&self, mark: Mark, actor: impl Into<String>) -> Self {
        let mut players = self.players.clone();
        players.seat(mark, actor);
        Self {
            players,
            ..self.clone()
        }
    }

    /// Returns the outcome, if the game is over.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// True once the game has an outcome.
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }
}
