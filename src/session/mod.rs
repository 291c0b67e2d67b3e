//! Online session: identity, lifecycle and polling.

mod client;
mod context;
mod poll;

pub use client::{PollApplied, SessionClient};
pub use context::{Phase, SessionContext};
pub use poll::{PollHandle, PollLoop, PollSettings, PollUpdate};
