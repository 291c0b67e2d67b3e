//! Session error types.

use derive_more::{Display, Error};
use winliam_tictactoe::{Mark, MoveError, SessionId};

/// What went wrong with a session operation.
///
/// Every kind is terminal to the operation that produced it only; the
/// session and the last known-good snapshot survive it.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionErrorKind {
    /// The service (or the client, for guests) refused to create a session.
    #[display("Could not create a session: {_0}")]
    CreateRejected(String),

    /// The service (or the client, for guests) refused the join.
    #[display("Could not join the session: {_0}")]
    JoinRejected(String),

    /// No side is assigned, so there is nothing to move for.
    #[display("Not joined to a session")]
    NotJoined,

    /// The last known snapshot is terminal.
    #[display("The game is over")]
    GameOver,

    /// The last known snapshot says the other side moves next.
    #[display("Not your turn ({_0} to move)")]
    NotYourTurn(Mark),

    /// The index does not name a board cell.
    #[display("Cell {_0} is off the board (cells are 0-8)")]
    InvalidCell(usize),

    /// The cell is already marked in the last known snapshot.
    #[display("Cell {_0} is already taken")]
    CellOccupied(usize),

    /// The service rejected the move (stale turn, taken cell, unknown session).
    #[display("Move rejected: {_0}")]
    MoveRejected(String),

    /// The session no longer exists on the service.
    #[display("Session {_0} not found")]
    SessionNotFound(SessionId),

    /// The request could not complete or the reply was malformed.
    #[display("Network failure: {_0}")]
    NetworkFailure(String),
}

impl From<MoveError> for SessionErrorKind {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::OutOfBounds(index) => SessionErrorKind::InvalidCell(index),
            MoveError::SquareOccupied(index) => SessionErrorKind::CellOccupied(index),
            MoveError::GameOver => SessionErrorKind::GameOver,
        }
    }
}

/// Session error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", kind, file, line)]
pub struct SessionError {
    /// Error kind.
    pub kind: SessionErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &SessionErrorKind {
        &self.kind
    }

    /// The message shown to the user.
    pub fn notice(&self) -> String {
        self.kind.to_string()
    }

    /// Shorthand for a network failure.
    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::NetworkFailure(message.into()))
    }
}

impl From<SessionErrorKind> for SessionError {
    #[track_caller]
    fn from(kind: SessionErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<MoveError> for SessionError {
    #[track_caller]
    fn from(err: MoveError) -> Self {
        Self::new(err.into())
    }
}

impl From<reqwest::Error> for SessionError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_decode() {
            format!("malformed response: {err}")
        } else {
            err.to_string()
        };
        Self::network(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_omits_location() {
        let err = SessionError::new(SessionErrorKind::NotYourTurn(Mark::X));
        assert_eq!(err.notice(), "Not your turn (X to move)");
        assert!(err.to_string().contains("error.rs"));
    }

    #[test]
    fn test_move_error_maps_to_kind() {
        let err: SessionError = MoveError::SquareOccupied(4).into();
        assert_eq!(err.kind(), &SessionErrorKind::CellOccupied(4));
        assert_eq!(err.notice(), "Cell 4 is already taken");
    }
}
