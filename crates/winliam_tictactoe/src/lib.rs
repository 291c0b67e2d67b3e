//! Pure tic-tac-toe rules and snapshot types.
//!
//! Everything here is synchronous and free of I/O: the [`GameState`]
//! snapshot a client holds, the rules deciding wins and ties, and the
//! [`LocalMoveEngine`] used for offline play.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
pub mod rules;
mod types;

pub use engine::{LocalMoveEngine, MoveError, apply_move};
pub use types::{Board, GameState, LOCAL_SESSION_ID, Mark, Outcome, Players, SessionId, Square};
