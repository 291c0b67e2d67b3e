//! Background refresh of session state.

use crate::config::ClientConfig;
use crate::error::{SessionError, SessionErrorKind};
use crate::service::GameService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use winliam_tictactoe::{GameState, SessionId};

/// Backoff never grows past this multiple of the initial delay.
const MAX_BACKOFF_FACTOR: u32 = 8;

/// Timing of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between fetches.
    pub interval: Duration,
    /// Consecutive network failures retried before halting.
    pub retry_limit: u32,
    /// Delay before the first retry; doubled for each further one.
    pub backoff: Duration,
}

impl PollSettings {
    /// Takes poll timing from the client configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            retry_limit: *config.poll_retry_limit(),
            backoff: config.poll_backoff(),
        }
    }

    /// Delay after the `failures`-th consecutive failure.
    pub fn backoff_for(&self, failures: u32) -> Duration {
        let factor = 1u32
            .checked_shl(failures.saturating_sub(1))
            .unwrap_or(MAX_BACKOFF_FACTOR)
            .min(MAX_BACKOFF_FACTOR);
        self.backoff * factor
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// One poll result, tagged with the session it was fetched for.
#[derive(Debug, Clone)]
pub struct PollUpdate {
    /// Session id captured when the loop started.
    pub session_id: SessionId,
    /// Which establishment of that session the loop belongs to. A session
    /// left and re-joined under the same id gets a new generation.
    pub generation: u64,
    /// Fetched snapshot or the failure that halted the loop.
    pub result: Result<GameState, SessionError>,
}

/// Fetches one session's state on a fixed interval until the game ends
/// or a fetch fails for good.
pub struct PollLoop {
    service: Arc<dyn GameService>,
    session_id: SessionId,
    generation: u64,
    settings: PollSettings,
    updates: mpsc::UnboundedSender<PollUpdate>,
}

impl PollLoop {
    /// Creates a loop for `session_id` reporting on `updates`, tagging
    /// every update with `generation`.
    pub fn new(
        service: Arc<dyn GameService>,
        session_id: SessionId,
        generation: u64,
        settings: PollSettings,
        updates: mpsc::UnboundedSender<PollUpdate>,
    ) -> Self {
        Self {
            service,
            session_id,
            generation,
            settings,
            updates,
        }
    }

    /// Runs the loop as a task on the current runtime.
    pub fn spawn(self) -> PollHandle {
        PollHandle {
            task: tokio::spawn(self.run()),
        }
    }

    /// Runs the loop to completion.
    ///
    /// Every snapshot is reported. The loop returns after reporting a
    /// terminal snapshot, after reporting a failure (exactly once), or when
    /// nobody is listening any more. Network failures are retried with
    /// backoff up to the retry limit; anything else halts at once.
    #[instrument(skip(self), fields(session_id = %self.session_id, generation = self.generation))]
    pub async fn run(self) {
        info!(interval_ms = self.settings.interval.as_millis() as u64, "Polling started");
        let mut failures = 0;
        let mut delay = self.settings.interval;

        loop {
            sleep(delay).await;

            match self.service.state(&self.session_id).await {
                Ok(state) => {
                    failures = 0;
                    delay = self.settings.interval;
                    let terminal = state.is_terminal();
                    debug!(turn = %state.turn(), terminal, "Polled session state");
                    if !self.report(Ok(state)) {
                        debug!("Update receiver gone, polling halted");
                        return;
                    }
                    if terminal {
                        info!("Game over, polling halted");
                        return;
                    }
                }
                Err(err)
                    if matches!(err.kind(), SessionErrorKind::NetworkFailure(_))
                        && failures < self.settings.retry_limit =>
                {
                    failures += 1;
                    delay = self.settings.backoff_for(failures);
                    warn!(
                        error = %err,
                        failures,
                        retry_in_ms = delay.as_millis() as u64,
                        "Poll failed, backing off"
                    );
                }
                Err(err) => {
                    warn!(error = %err, "Poll failed, polling halted");
                    self.report(Err(err));
                    return;
                }
            }
        }
    }

    fn report(&self, result: Result<GameState, SessionError>) -> bool {
        self.updates
            .send(PollUpdate {
                session_id: self.session_id.clone(),
                generation: self.generation,
                result,
            })
            .is_ok()
    }
}

/// Handle to a running poll loop. Dropping it stops the loop.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops the loop. A fetch already in flight is abandoned.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// True once the loop has returned or been stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let settings = PollSettings {
            interval: Duration::from_millis(500),
            retry_limit: 10,
            backoff: Duration::from_millis(100),
        };
        assert_eq!(settings.backoff_for(1), Duration::from_millis(100));
        assert_eq!(settings.backoff_for(2), Duration::from_millis(200));
        assert_eq!(settings.backoff_for(3), Duration::from_millis(400));
        assert_eq!(settings.backoff_for(4), Duration::from_millis(800));
        assert_eq!(settings.backoff_for(9), Duration::from_millis(800));
        assert_eq!(settings.backoff_for(40), Duration::from_millis(800));
    }
}
