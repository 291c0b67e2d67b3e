//! Move application and the offline game engine.

use crate::rules::{check_winner, is_full};
use crate::types::{GameState, Outcome};
use tracing::{debug, info, instrument};

/// Error that can occur when applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The index is not a board position.
    #[display("Position {_0} is off the board (must be 0-8)")]
    OutOfBounds(usize),

    /// The square at the position is already occupied.
    #[display("Square {_0} is already occupied")]
    SquareOccupied(usize),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}

/// Derives the snapshot that follows placing the mark to move at `index`.
///
/// The mark placed is always `state.turn()`; turn ownership by a
/// particular participant is the caller's concern.
#[instrument(skip(state), fields(session_id = %state.id(), turn = %state.turn()))]
pub fn apply_move(state: &GameState, index: usize) -> Result<GameState, MoveError> {
    if state.is_terminal() {
        return Err(MoveError::GameOver);
    }
    if index >= crate::Board::SIZE {
        return Err(MoveError::OutOfBounds(index));
    }
    if !state.board().is_empty(index) {
        return Err(MoveError::SquareOccupied(index));
    }

    let mark = state.turn();
    let board = state.board().with_mark(index, mark);
    let winner = match check_winner(&board) {
        Some(mark) => Some(Outcome::Winner(mark)),
        None if is_full(&board) => Some(Outcome::Tie),
        None => None,
    };
    debug!(index, ?winner, "Move applied");

    Ok(GameState::new(
        state.id(),
        board,
        mark.opponent(),
        state.players().clone(),
        winner,
    ))
}

/// Offline hot-seat game: both marks are played from the same place.
#[derive(Debug, Clone)]
pub struct LocalMoveEngine {
    state: GameState,
}

impl LocalMoveEngine {
    /// Creates an engine holding an empty board.
    pub fn new() -> Self {
        Self {
            state: GameState::local(),
        }
    }

    /// Returns the current snapshot.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Plays the mark to move at `index`.
    #[instrument(skip(self))]
    pub fn play(&mut self, index: usize) -> Result<&GameState, MoveError> {
        self.state = apply_move(&self.state, index)?;
        if let Some(outcome) = self.state.winner() {
            info!(%outcome, "Local game finished");
        }
        Ok(&self.state)
    }

    /// Clears the board for a new local game.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.state = GameState::local();
    }
}

impl Default for LocalMoveEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mark, Square};

    #[test]
    fn test_turns_alternate() {
        let mut engine = LocalMoveEngine::new();
        assert_eq!(engine.state().turn(), Mark::X);
        engine.play(4).unwrap();
        assert_eq!(engine.state().board().get(4), Some(Square::Occupied(Mark::X)));
        assert_eq!(engine.state().turn(), Mark::O);
        engine.play(0).unwrap();
        assert_eq!(engine.state().board().get(0), Some(Square::Occupied(Mark::O)));
        assert_eq!(engine.state().turn(), Mark::X);
    }

    #[test]
    fn test_occupied_square_rejected_without_change() {
        let mut engine = LocalMoveEngine::new();
        engine.play(4).unwrap();
        let before = engine.state().clone();
        assert_eq!(engine.play(4), Err(MoveError::SquareOccupied(4)));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut engine = LocalMoveEngine::new();
        assert_eq!(engine.play(9), Err(MoveError::OutOfBounds(9)));
    }

    #[test]
    fn test_win_ends_game() {
        let mut engine = LocalMoveEngine::new();
        for index in [0, 3, 1, 4, 2] {
            engine.play(index).unwrap();
        }
        assert_eq!(engine.state().winner(), Some(Outcome::Winner(Mark::X)));
        assert_eq!(engine.play(8), Err(MoveError::GameOver));
    }

    #[test]
    fn test_full_board_is_tie() {
        let mut engine = LocalMoveEngine::new();
        // X O X / X O O / O X X
        for index in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            engine.play(index).unwrap();
        }
        assert_eq!(engine.state().winner(), Some(Outcome::Tie));
    }

    #[test]
    fn test_board_only_fills() {
        let mut engine = LocalMoveEngine::new();
        let mut previous = engine.state().board().clone();
        for index in [4, 0, 8, 2, 6] {
            engine.play(index).unwrap();
            assert!(engine.state().board().extends(&previous));
            previous = engine.state().board().clone();
        }
    }

    #[test]
    fn test_reset_clears_board() {
        let mut engine = LocalMoveEngine::new();
        engine.play(0).unwrap();
        engine.reset();
        assert_eq!(engine.state(), &GameState::local());
    }
}
