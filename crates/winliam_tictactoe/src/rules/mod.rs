//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board); board storage lives in
//! `types` so the same rules serve the offline engine and any authority
//! that validates moves.

pub mod draw;
pub mod win;

pub use draw::{is_full, is_tie};
pub use win::{LINES, check_winner};
