//! Routes board input to the local engine or the online session.

use crate::error::SessionError;
use crate::identity::IdentityProvider;
use crate::notify::Notifier;
use crate::render::{BoardView, Renderer};
use crate::session::{PollApplied, PollUpdate, SessionClient};
use tracing::{debug, instrument};
use winliam_tictactoe::LocalMoveEngine;

/// Single entry point for user input.
///
/// While no session is active, cell selections play on the local board.
/// Once a session is created or joined they become online moves. Every
/// failure is reported through the notifier and also returned; the board
/// is redrawn only when its projected view actually changed.
pub struct InputRouter<R: Renderer> {
    session: SessionClient,
    local: LocalMoveEngine,
    identity: Box<dyn IdentityProvider>,
    notifier: Box<dyn Notifier>,
    renderer: R,
    last_view: Option<BoardView>,
}

impl<R: Renderer> InputRouter<R> {
    /// Creates a router and draws the initial board.
    pub fn new(
        session: SessionClient,
        identity: Box<dyn IdentityProvider>,
        notifier: Box<dyn Notifier>,
        renderer: R,
    ) -> Self {
        let mut router = Self {
            session,
            local: LocalMoveEngine::new(),
            identity,
            notifier,
            renderer,
            last_view: None,
        };
        router.refresh();
        router
    }

    /// The online session client.
    pub fn session(&self) -> &SessionClient {
        &self.session
    }

    /// The offline board.
    pub fn local(&self) -> &LocalMoveEngine {
        &self.local
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// What the board shows right now.
    pub fn view(&self) -> BoardView {
        if self.session.is_active() {
            BoardView::project(self.session.state(), self.session.context().side())
        } else {
            BoardView::project(self.local.state(), None)
        }
    }

    /// Handles a click on cell `index` (0-8).
    #[instrument(skip(self), fields(online = self.session.is_active()))]
    pub async fn select_cell(&mut self, index: usize) -> Result<(), SessionError> {
        let result = if self.session.is_active() {
            self.session.submit_move(index).await.map(|_| ())
        } else {
            self.local
                .play(index)
                .map(|_| ())
                .map_err(SessionError::from)
        };
        self.settle(result)
    }

    /// Creates an online session as the current actor.
    #[instrument(skip(self))]
    pub async fn create(&mut self) -> Result<(), SessionError> {
        let actor = self.identity.actor();
        let result = self.session.create(&actor).await.map(|state| state.id().to_string());
        if let Ok(id) = &result {
            self.notifier
                .notify(&format!("Session {} created. Share the id so an opponent can join.", id));
        }
        self.settle(result.map(|_| ()))
    }

    /// Joins online session `id` as the current actor.
    #[instrument(skip(self))]
    pub async fn join(&mut self, id: &str) -> Result<(), SessionError> {
        let actor = self.identity.actor();
        let result = self.session.join(id, &actor).await.map(|_| ());
        if result.is_ok() {
            let side = self.session.context().side();
            let session_id = self.session.context().session_id().unwrap_or(id);
            let message = match side {
                Some(side) => format!("Joined session {} as {}", session_id, side),
                None => format!("Joined session {}", session_id),
            };
            self.notifier.notify(&message);
        }
        self.settle(result)
    }

    /// Leaves the online session, if any, and starts a fresh local board.
    #[instrument(skip(self))]
    pub fn leave(&mut self) {
        if let Some(id) = self.session.context().session_id() {
            let message = format!("Left session {}", id);
            self.session.leave();
            self.notifier.notify(&message);
        }
        self.local.reset();
        self.refresh();
    }

    /// Clears the local board. Has no effect on an online session.
    pub fn new_local_game(&mut self) {
        self.local.reset();
        self.refresh();
    }

    /// Applies a poll update from the session's update channel.
    #[instrument(skip(self, update), fields(session_id = %update.session_id))]
    pub fn on_poll(&mut self, update: PollUpdate) -> Result<PollApplied, SessionError> {
        let result = self.session.apply_poll(update);
        if let Ok(PollApplied::Discarded) = result {
            return result;
        }
        self.settle(result)
    }

    /// Reports a failure, then redraws if anything visible changed.
    fn settle<T>(&mut self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(err) = &result {
            debug!(error = %err, "Input failed");
            self.notifier.notify(&err.notice());
        }
        self.refresh();
        result
    }

    fn refresh(&mut self) {
        let view = self.view();
        if self.last_view.as_ref() == Some(&view) {
            return;
        }
        self.renderer.render(&view);
        self.last_view = Some(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionErrorKind;
    use crate::identity::{Actor, StaticIdentity};
    use crate::notify::ChannelNotifier;
    use crate::render::RetainedView;
    use crate::service::{Created, GameService, Joined};
    use crate::session::PollSettings;
    use async_trait::async_trait;
    use std::sync::Arc;
    use winliam_tictactoe::{GameState, Mark};

    /// Service that is never reachable.
    struct Offline;

    #[async_trait]
    impl GameService for Offline {
        async fn create(&self, _actor: &str) -> Result<Created, SessionError> {
            Err(SessionError::network("connection refused"))
        }
        async fn join(&self, _id: &str, _actor: &str) -> Result<Joined, SessionError> {
            Err(SessionError::network("connection refused"))
        }
        async fn submit_move(
            &self,
            _id: &str,
            _actor: &str,
            _index: usize,
        ) -> Result<GameState, SessionError> {
            Err(SessionError::network("connection refused"))
        }
        async fn state(&self, _id: &str) -> Result<GameState, SessionError> {
            Err(SessionError::network("connection refused"))
        }
    }

    fn router(actor: Actor) -> (InputRouter<RetainedView>, tokio::sync::mpsc::UnboundedReceiver<String>) {
        let (session, _updates) = SessionClient::new(Arc::new(Offline), PollSettings::default());
        let (notifier, notices) = ChannelNotifier::new();
        let router = InputRouter::new(
            session,
            Box::new(StaticIdentity::new(actor)),
            Box::new(notifier),
            RetainedView::default(),
        );
        (router, notices)
    }

    #[tokio::test]
    async fn test_local_play_when_idle() {
        let (mut router, _notices) = router(Actor::Guest);
        router.select_cell(4).await.unwrap();

        assert_eq!(router.local().state().board().get(4).and_then(|s| s.mark()), Some(Mark::X));
        let view = router.renderer().view().unwrap();
        assert_eq!(view.cells()[4], "X");
        assert_eq!(router.renderer().renders(), 2);
    }

    #[tokio::test]
    async fn test_occupied_local_cell_notifies_without_redraw() {
        let (mut router, mut notices) = router(Actor::Guest);
        router.select_cell(0).await.unwrap();
        let err = router.select_cell(0).await.unwrap_err();

        assert!(matches!(err.kind(), SessionErrorKind::CellOccupied(0)));
        assert_eq!(notices.try_recv().unwrap(), "Cell 0 is already taken");
        assert_eq!(router.renderer().renders(), 2);
    }

    #[tokio::test]
    async fn test_guest_create_is_refused() {
        let (mut router, mut notices) = router(Actor::Guest);
        let err = router.create().await.unwrap_err();

        assert!(matches!(err.kind(), SessionErrorKind::CreateRejected(_)));
        assert!(notices.try_recv().unwrap().contains("sign in"));
        assert!(!router.session().is_active());
    }

    #[tokio::test]
    async fn test_unreachable_service_keeps_local_board() {
        let (mut router, mut notices) = router(Actor::User("alice".into()));
        router.select_cell(2).await.unwrap();
        let err = router.create().await.unwrap_err();

        assert!(matches!(err.kind(), SessionErrorKind::NetworkFailure(_)));
        assert!(notices.try_recv().unwrap().contains("connection refused"));
        assert_eq!(router.view().cells()[2], "X");
    }

    #[tokio::test]
    async fn test_new_local_game_clears_board() {
        let (mut router, _notices) = router(Actor::Guest);
        router.select_cell(0).await.unwrap();
        router.new_local_game();
        assert_eq!(router.view(), BoardView::default());
        assert_eq!(router.renderer().renders(), 3);
    }
}
