//! Client-local session identity and the last known snapshot.

use winliam_tictactoe::{GameState, Mark, SessionId};

/// Where a session is in its life, from this client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Phase {
    /// No session; input goes to the local board.
    Idle,
    /// Session created here, game in progress.
    Created,
    /// Session joined here, game in progress.
    Joined,
    /// Game over; identity kept until leave.
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    Created,
    Joined,
}

/// Identity of an active session. Id and side are only ever set together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Seat {
    pub(crate) session_id: SessionId,
    pub(crate) side: Mark,
    pub(crate) actor: String,
    pub(crate) origin: Origin,
}

/// The single owned slot holding session identity and state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub(crate) seat: Option<Seat>,
    pub(crate) state: GameState,
}

impl SessionContext {
    /// No session, empty local board.
    pub fn idle() -> Self {
        Self {
            seat: None,
            state: GameState::local(),
        }
    }

    /// Active session id.
    pub fn session_id(&self) -> Option<&str> {
        self.seat.as_ref().map(|seat| seat.session_id.as_str())
    }

    /// Side this client plays in the active session.
    pub fn side(&self) -> Option<Mark> {
        self.seat.as_ref().map(|seat| seat.side)
    }

    /// Username moves are submitted under.
    pub fn actor(&self) -> Option<&str> {
        self.seat.as_ref().map(|seat| seat.actor.as_str())
    }

    /// Last known snapshot.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// True while a session id is set.
    pub fn is_active(&self) -> bool {
        self.seat.is_some()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        match &self.seat {
            None => Phase::Idle,
            Some(_) if self.state.is_terminal() => Phase::Terminal,
            Some(seat) => match seat.origin {
                Origin::Created => Phase::Created,
                Origin::Joined => Phase::Joined,
            },
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::idle()
    }
}
