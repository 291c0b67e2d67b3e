//! Session lifecycle against the game service.

use super::context::{Origin, Seat, SessionContext};
use super::poll::{PollHandle, PollLoop, PollSettings, PollUpdate};
use crate::error::{SessionError, SessionErrorKind};
use crate::identity::Actor;
use crate::service::GameService;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use winliam_tictactoe::{Board, GameState, Mark};

/// What a poll update did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollApplied {
    /// The snapshot replaced the held state.
    Changed,
    /// The snapshot matched the held state.
    Unchanged,
    /// The update belonged to another session or predates the held state.
    Discarded,
}

/// Owns session identity and talks to the game service.
///
/// This is the only writer of the [`SessionContext`]. Poll results come
/// back through the receiver handed out by [`SessionClient::new`] and must
/// be fed to [`SessionClient::apply_poll`].
pub struct SessionClient {
    service: Arc<dyn GameService>,
    context: SessionContext,
    poll_settings: PollSettings,
    updates: mpsc::UnboundedSender<PollUpdate>,
    poller: Option<PollHandle>,
    generation: u64,
}

impl SessionClient {
    /// Creates an idle client and the receiver its poll updates arrive on.
    pub fn new(
        service: Arc<dyn GameService>,
        poll_settings: PollSettings,
    ) -> (Self, mpsc::UnboundedReceiver<PollUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let client = Self {
            service,
            context: SessionContext::idle(),
            poll_settings,
            updates,
            poller: None,
            generation: 0,
        };
        (client, rx)
    }

    /// Session identity and last known snapshot.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Last known snapshot.
    pub fn state(&self) -> &GameState {
        self.context.state()
    }

    /// True while a session id is set.
    pub fn is_active(&self) -> bool {
        self.context.is_active()
    }

    /// Bumped on every establish and leave. Poll updates carrying any
    /// other value are discarded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while the poll loop is running.
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|poller| !poller.is_finished())
    }

    /// Creates a session as `actor`, who plays X.
    ///
    /// Guests are refused before any request is made. On failure the
    /// current identity is left exactly as it was.
    #[instrument(skip(self), fields(actor = %actor))]
    pub async fn create(&mut self, actor: &Actor) -> Result<&GameState, SessionError> {
        let Some(name) = actor.name() else {
            warn!("Guest tried to create a session");
            return Err(SessionErrorKind::CreateRejected("sign in to play online".into()).into());
        };

        let created = self.service.create(name).await?;
        let seat = Seat {
            session_id: created.id,
            side: Mark::X,
            actor: name.to_string(),
            origin: Origin::Created,
        };
        self.establish(seat, created.game);
        Ok(self.context.state())
    }

    /// Joins session `id` as `actor`.
    ///
    /// The side comes from the reply when the service names one; otherwise
    /// the actor plays X when seated there and O in every other case.
    #[instrument(skip(self), fields(actor = %actor))]
    pub async fn join(&mut self, id: &str, actor: &Actor) -> Result<&GameState, SessionError> {
        let Some(name) = actor.name() else {
            warn!("Guest tried to join a session");
            return Err(SessionErrorKind::JoinRejected("sign in to play online".into()).into());
        };
        let id = id.trim();
        if id.is_empty() {
            return Err(SessionErrorKind::JoinRejected("no session id given".into()).into());
        }

        let joined = self.service.join(id, name).await?;
        let side = joined.side.unwrap_or_else(|| {
            if joined.game.players().get(Mark::X) == Some(name) {
                Mark::X
            } else {
                Mark::O
            }
        });
        let seat = Seat {
            session_id: id.to_string(),
            side,
            actor: name.to_string(),
            origin: Origin::Joined,
        };
        self.establish(seat, joined.game);
        Ok(self.context.state())
    }

    /// Plays the local side's mark at `index`.
    ///
    /// Turn, game-over and cell checks run against the last known snapshot
    /// before any request, so a move that cannot succeed is never sent. The
    /// service still has the final say; its reply replaces the held state
    /// at once unless it is older than the held state. On any error the
    /// held state is untouched.
    #[instrument(skip(self), fields(session_id = ?self.context.session_id()))]
    pub async fn submit_move(&mut self, index: usize) -> Result<&GameState, SessionError> {
        let seat = self
            .context
            .seat
            .as_ref()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NotJoined))?;
        let state = &self.context.state;
        if state.is_terminal() {
            return Err(SessionErrorKind::GameOver.into());
        }
        if state.turn() != seat.side {
            debug!(turn = %state.turn(), side = %seat.side, "Move short-circuited: not our turn");
            return Err(SessionErrorKind::NotYourTurn(state.turn()).into());
        }
        if index >= Board::SIZE {
            return Err(SessionErrorKind::InvalidCell(index).into());
        }
        if !state.board().is_empty(index) {
            return Err(SessionErrorKind::CellOccupied(index).into());
        }

        let (session_id, actor) = (seat.session_id.clone(), seat.actor.clone());
        let next = self.service.submit_move(&session_id, &actor, index).await?;
        info!(index, "Move accepted");
        if supersedes(&self.context.state, &next) {
            self.context.state = next;
        } else {
            debug!("Keeping held state over an older move reply");
        }
        if self.context.state.is_terminal() {
            info!(winner = ?self.context.state.winner(), "Game over");
            self.stop_polling();
        }
        Ok(self.context.state())
    }

    /// Drops the session locally: identity cleared, polling stopped, board
    /// back to the empty local board. The service is not contacted.
    #[instrument(skip(self), fields(session_id = ?self.context.session_id()))]
    pub fn leave(&mut self) {
        self.stop_polling();
        if self.context.is_active() {
            info!("Left session");
        }
        self.generation += 1;
        self.context = SessionContext::idle();
    }

    /// Applies a poll result.
    ///
    /// Updates for any session other than the active one are discarded,
    /// as are updates from a poll loop started before the latest establish
    /// or leave, and snapshots older than the held one. A failure ends
    /// polling and is returned for the caller to surface; `SessionNotFound`
    /// also drops the session.
    #[instrument(
        skip(self, update),
        fields(session_id = %update.session_id, generation = update.generation)
    )]
    pub fn apply_poll(&mut self, update: PollUpdate) -> Result<PollApplied, SessionError> {
        if self.context.session_id() != Some(update.session_id.as_str()) {
            debug!(active = ?self.context.session_id(), "Discarding update for inactive session");
            return Ok(PollApplied::Discarded);
        }
        if update.generation != self.generation {
            debug!(current = self.generation, "Discarding update from a retired poll loop");
            return Ok(PollApplied::Discarded);
        }

        match update.result {
            Ok(state) => {
                let held = &self.context.state;
                if !supersedes(held, &state) {
                    debug!("Discarding snapshot older than held state");
                    return Ok(PollApplied::Discarded);
                }
                let applied = if state == *held {
                    PollApplied::Unchanged
                } else {
                    self.context.state = state;
                    PollApplied::Changed
                };
                if self.context.state.is_terminal() && self.poller.is_some() {
                    info!(winner = ?self.context.state.winner(), "Game over");
                    self.stop_polling();
                }
                Ok(applied)
            }
            Err(err) => {
                // The loop halts itself after reporting a failure.
                self.poller = None;
                if matches!(err.kind(), SessionErrorKind::SessionNotFound(_)) {
                    warn!("Session vanished from the service, dropping it");
                    self.context = SessionContext::idle();
                }
                Err(err)
            }
        }
    }

    /// Installs a new session, replacing any previous one.
    fn establish(&mut self, seat: Seat, state: GameState) {
        self.stop_polling();
        self.generation += 1;
        info!(
            session_id = %seat.session_id,
            side = %seat.side,
            origin = ?seat.origin,
            "Session established"
        );
        let terminal = state.is_terminal();
        let session_id = seat.session_id.clone();
        self.context = SessionContext {
            seat: Some(seat),
            state,
        };
        if !terminal {
            self.poller = Some(
                PollLoop::new(
                    Arc::clone(&self.service),
                    session_id,
                    self.generation,
                    self.poll_settings,
                    self.updates.clone(),
                )
                .spawn(),
            );
        }
    }

    fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            debug!("Stopping poll loop");
            poller.stop();
        }
    }
}

/// True unless `next` is older than `held`: a board missing marks `held`
/// has, or an unfinished game after a finished one.
///
/// Cells only ever fill on the service and a session is never reset, so a
/// snapshot failing this check is a reordered reply, whichever path it
/// arrived on.
fn supersedes(held: &GameState, next: &GameState) -> bool {
    next.board().extends(held.board()) && (next.is_terminal() || !held.is_terminal())
}
