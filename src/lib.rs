//! WinliamOS games - online tic-tac-toe client
//!
//! Plays tic-tac-toe either on a local board or against another user
//! through a remote game service, keeping the displayed board in step
//! with the service's authoritative state by polling.
//!
//! # Architecture
//!
//! - **Service**: HTTP/JSON client for the game service
//! - **Session**: session identity, lifecycle and the poll loop
//! - **Router**: sends board input to the local engine or the session
//! - **Render**: projects a snapshot onto the 3x3 display
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use winliam_games::{
//!     Actor, ClientConfig, InputRouter, PollSettings, RestGameService, RetainedView,
//!     SessionClient, StaticIdentity, TracingNotifier,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::load(None)?;
//! let service = Arc::new(RestGameService::new(&config)?);
//! let (session, mut updates) = SessionClient::new(service, PollSettings::from_config(&config));
//! let mut router = InputRouter::new(
//!     session,
//!     Box::new(StaticIdentity::new(Actor::from_name("alice"))),
//!     Box::new(TracingNotifier),
//!     RetainedView::default(),
//! );
//!
//! router.create().await?;
//! router.select_cell(4).await?;
//! while let Some(update) = updates.recv().await {
//!     let _ = router.on_poll(update);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod identity;
mod notify;
pub mod render;
mod router;
pub mod service;
pub mod session;

pub use config::{ClientConfig, ConfigError, POLL_INTERVAL_ENV, SERVER_URL_ENV};
pub use error::{SessionError, SessionErrorKind};
pub use identity::{Actor, GUEST_NAME, IdentityProvider, StaticIdentity};
pub use notify::{ChannelNotifier, Notifier, TracingNotifier};
pub use render::{BoardView, BoardWidget, Renderer, RetainedView};
pub use router::InputRouter;
pub use service::{Created, GameService, Joined, RestGameService};
pub use session::{
    Phase, PollApplied, PollHandle, PollLoop, PollSettings, PollUpdate, SessionClient,
    SessionContext,
};

pub use winliam_tictactoe::{
    Board, GameState, LOCAL_SESSION_ID, LocalMoveEngine, Mark, MoveError, Outcome, Players,
    SessionId, Square,
};
