//! The remote game service, as seen from the client.

mod rest;
pub mod wire;

pub use rest::RestGameService;

use crate::error::SessionError;
use async_trait::async_trait;
use winliam_tictactoe::{GameState, Mark, SessionId};

/// Reply to a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    /// Identifier assigned by the service.
    pub id: SessionId,
    /// Initial snapshot.
    pub game: GameState,
}

/// Reply to a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// Side assigned by the service, when it says so explicitly.
    pub side: Option<Mark>,
    /// Snapshot after the join.
    pub game: GameState,
}

/// Authoritative game service.
///
/// Implementations map service-reported failures onto the matching
/// [`SessionErrorKind`](crate::SessionErrorKind): `CreateRejected` for
/// create, `JoinRejected` for join, `MoveRejected` for moves and
/// `SessionNotFound` for state fetches of a vanished session. Anything
/// that keeps a request from completing, including a malformed reply,
/// is a `NetworkFailure`.
#[async_trait]
pub trait GameService: Send + Sync {
    /// Creates a session with `actor` seated on X.
    async fn create(&self, actor: &str) -> Result<Created, SessionError>;

    /// Seats `actor` in session `id`.
    async fn join(&self, id: &str, actor: &str) -> Result<Joined, SessionError>;

    /// Plays `actor`'s mark at cell `index` of session `id`.
    async fn submit_move(
        &self,
        id: &str,
        actor: &str,
        index: usize,
    ) -> Result<GameState, SessionError>;

    /// Fetches the current snapshot of session `id`.
    async fn state(&self, id: &str) -> Result<GameState, SessionError>;
}
