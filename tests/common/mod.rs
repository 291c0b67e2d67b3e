//! Shared fixtures: an in-memory game service and poll helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use winliam_games::{
    Created, GameService, GameState, Joined, Mark, PollSettings, PollUpdate, SessionError,
    SessionErrorKind,
};
use winliam_tictactoe::apply_move;

/// Authoritative service kept in memory. Ids are "g1", "g2", ...
#[derive(Default)]
pub struct FakeService {
    games: Mutex<HashMap<String, GameState>>,
    next_id: AtomicUsize,
    failing_fetches: AtomicUsize,
    pub creates: AtomicUsize,
    pub joins: AtomicUsize,
    pub moves: AtomicUsize,
    pub fetches: AtomicUsize,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current authoritative snapshot of `id`.
    pub fn snapshot(&self, id: &str) -> Option<GameState> {
        self.games.lock().unwrap().get(id).cloned()
    }

    /// Deletes session `id`, as if it expired on the service.
    pub fn discard(&self, id: &str) {
        self.games.lock().unwrap().remove(id);
    }

    /// Makes the next `n` state fetches fail with a network error.
    pub fn fail_next_fetches(&self, n: usize) {
        self.failing_fetches.store(n, Ordering::SeqCst);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameService for FakeService {
    async fn create(&self, actor: &str) -> Result<Created, SessionError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let id = format!("g{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let game = GameState::fresh(id.clone()).with_seat(Mark::X, actor);
        self.games.lock().unwrap().insert(id.clone(), game.clone());
        Ok(Created { id, game })
    }

    async fn join(&self, id: &str, actor: &str) -> Result<Joined, SessionError> {
        self.joins.fetch_add(1, Ordering::SeqCst);
        let mut games = self.games.lock().unwrap();
        let game = games
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::new(SessionErrorKind::JoinRejected("session not found".into())))?;

        let game = if game.players().side_of(actor).is_some() {
            game
        } else if game.players().get(Mark::O).is_none() {
            game.with_seat(Mark::O, actor)
        } else {
            return Err(SessionErrorKind::JoinRejected("session is full".into()).into());
        };
        games.insert(id.to_string(), game.clone());
        Ok(Joined { side: None, game })
    }

    async fn submit_move(
        &self,
        id: &str,
        actor: &str,
        index: usize,
    ) -> Result<GameState, SessionError> {
        self.moves.fetch_add(1, Ordering::SeqCst);
        let mut games = self.games.lock().unwrap();
        let game = games
            .get(id)
            .ok_or_else(|| SessionError::new(SessionErrorKind::MoveRejected("session not found".into())))?;
        let side = game
            .players()
            .side_of(actor)
            .ok_or_else(|| SessionError::new(SessionErrorKind::MoveRejected("not a player".into())))?;
        if side != game.turn() {
            return Err(SessionErrorKind::MoveRejected("not your turn".into()).into());
        }
        let next = apply_move(game, index)
            .map_err(|e| SessionError::new(SessionErrorKind::MoveRejected(e.to_string())))?;
        games.insert(id.to_string(), next.clone());
        Ok(next)
    }

    async fn state(&self, id: &str) -> Result<GameState, SessionError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing_fetches.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_fetches.store(failing - 1, Ordering::SeqCst);
            return Err(SessionError::network("connection reset"));
        }
        self.snapshot(id)
            .ok_or_else(|| SessionErrorKind::SessionNotFound(id.to_string()).into())
    }
}

/// Fast poll timing for tests.
pub fn fast_polling() -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(10),
        retry_limit: 2,
        backoff: Duration::from_millis(5),
    }
}

/// Waits for the next poll update, failing the test after two seconds.
pub async fn next_update(rx: &mut mpsc::UnboundedReceiver<PollUpdate>) -> PollUpdate {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a poll update")
        .expect("poll channel closed")
}

/// True if no update arrives within `wait`.
pub async fn quiet_for(rx: &mut mpsc::UnboundedReceiver<PollUpdate>, wait: Duration) -> bool {
    tokio::time::timeout(wait, rx.recv()).await.is_err()
}
