//! JSON shapes exchanged with the game service.
//!
//! Every reply is an [`Envelope`]. Game snapshots travel as [`GameWire`]
//! and are validated into a [`GameState`] before anything else sees them.

use crate::error::SessionError;
use derive_new::new;
use serde::{Deserialize, Serialize};
use winliam_tictactoe::{Board, GameState, Mark, Outcome, Players, SessionId, Square};

/// Wire spelling of a tie.
pub const TIE: &str = "tie";

/// Body of create and join requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct ActorRequest {
    /// Acting username.
    pub actor: String,
}

/// Body of a move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct MoveRequest {
    /// Acting username.
    pub actor: String,
    /// Target cell (0-8, row-major).
    pub index: usize,
}

/// Reply envelope shared by every endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the service accepted the request.
    #[serde(default)]
    pub success: bool,
    /// Session identifier (create replies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SessionId>,
    /// Assigned side (join replies, optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Mark>,
    /// Snapshot after the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<GameWire>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// Successful reply carrying a snapshot.
    pub fn with_game(game: &GameState) -> Self {
        Self {
            success: true,
            game: Some(GameWire::from_state(game)),
            ..Self::default()
        }
    }

    /// Failed reply.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Failure reason, or a placeholder when the service gave none.
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "service gave no reason".to_string())
    }

    /// Validates the carried snapshot for session `id`.
    #[track_caller]
    pub fn into_state(self, id: &str) -> Result<GameState, SessionError> {
        self.game
            .ok_or_else(|| SessionError::network("malformed response: missing game"))?
            .into_state(id)
    }
}

/// Seating on the wire: `{"X": name|null, "O": name|null}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayersWire {
    /// Participant on X.
    #[serde(rename = "X", default)]
    pub x: Option<String>,
    /// Participant on O.
    #[serde(rename = "O", default)]
    pub o: Option<String>,
}

/// Snapshot on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWire {
    /// Nine cells, row-major: `"X"`, `"O"`, or `null`/`""` when empty.
    pub board: Vec<Option<String>>,
    /// Mark to move.
    pub turn: Mark,
    /// `"X"`, `"O"` or `"tie"` once the game is over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    /// Seating.
    #[serde(default)]
    pub players: PlayersWire,
}

impl GameWire {
    /// Encodes a snapshot.
    pub fn from_state(state: &GameState) -> Self {
        Self {
            board: state
                .board()
                .squares()
                .iter()
                .map(|square| square.mark().map(|mark| mark.to_string()))
                .collect(),
            turn: state.turn(),
            winner: state.winner().map(|outcome| match outcome {
                Outcome::Winner(mark) => mark.to_string(),
                Outcome::Tie => TIE.to_string(),
            }),
            players: PlayersWire {
                x: state.players().get(Mark::X).map(str::to_string),
                o: state.players().get(Mark::O).map(str::to_string),
            },
        }
    }

    /// Validates this payload into a snapshot of session `id`.
    ///
    /// A wrong cell count or an unknown mark is a `NetworkFailure`: the
    /// reply did not carry a usable game.
    #[track_caller]
    pub fn into_state(self, id: &str) -> Result<GameState, SessionError> {
        if self.board.len() != Board::SIZE {
            return Err(SessionError::network(format!(
                "malformed game: board has {} cells",
                self.board.len()
            )));
        }

        let mut squares = [Square::Empty; 9];
        for (square, cell) in squares.iter_mut().zip(&self.board) {
            *square = match cell.as_deref().map(str::trim) {
                None | Some("") => Square::Empty,
                Some(raw) => Square::Occupied(parse_mark(raw).ok_or_else(|| {
                    SessionError::network(format!("malformed game: unknown mark {raw:?}"))
                })?),
            };
        }

        let winner = match self.winner.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) if raw.eq_ignore_ascii_case(TIE) => Some(Outcome::Tie),
            Some(raw) => Some(Outcome::Winner(parse_mark(raw).ok_or_else(|| {
                SessionError::network(format!("malformed game: unknown winner {raw:?}"))
            })?)),
        };

        Ok(GameState::new(
            id,
            Board::from_squares(squares),
            self.turn,
            Players::new(seat(self.players.x), seat(self.players.o)),
            winner,
        ))
    }
}

/// A blank name is an open seat, like a blank cell.
fn seat(name: Option<String>) -> Option<String> {
    name.filter(|name| !name.trim().is_empty())
}

fn parse_mark(raw: &str) -> Option<Mark> {
    match raw {
        "X" | "x" => Some(Mark::X),
        "O" | "o" => Some(Mark::O),
        _ => None,
    }
}
