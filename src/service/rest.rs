//! Game service over HTTP + JSON.

use super::wire::{ActorRequest, Envelope, MoveRequest};
use super::{Created, GameService, Joined};
use crate::config::ClientConfig;
use crate::error::{SessionError, SessionErrorKind};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info, instrument, warn};
use winliam_tictactoe::GameState;

/// HTTP client for the game service.
///
/// Routes live under `{server_url}/api/sessions`.
#[derive(Debug, Clone)]
pub struct RestGameService {
    base_url: String,
    client: reqwest::Client,
}

impl RestGameService {
    /// Creates a client with the configured request timeout.
    #[instrument(skip(config), fields(server_url = %config.server_url()))]
    pub fn new(config: &ClientConfig) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        info!("Game service client ready");
        Ok(Self {
            base_url: config.server_url().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/sessions{}", self.base_url, path)
    }

    /// Sends a request and decodes the reply envelope.
    ///
    /// A non-JSON body is malformed on success statuses. On error statuses
    /// it is turned into a failure envelope, except 404 which keeps its
    /// "not found" meaning.
    async fn exchange(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, Envelope), SessionError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, body = %body, "Service reply");

        match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) => Ok((status, envelope)),
            Err(e) if status.is_success() => Err(SessionError::network(format!(
                "malformed response: {}",
                e
            ))),
            Err(_) if status == StatusCode::NOT_FOUND => {
                Ok((status, Envelope::failure("not found")))
            }
            Err(_) => Err(SessionError::network(format!("HTTP {}", status))),
        }
    }
}

fn is_not_found(status: StatusCode, envelope: &Envelope) -> bool {
    status == StatusCode::NOT_FOUND
        || envelope
            .error
            .as_deref()
            .is_some_and(|e| e.to_ascii_lowercase().contains("not found"))
}

#[async_trait]
impl GameService for RestGameService {
    #[instrument(skip(self))]
    async fn create(&self, actor: &str) -> Result<Created, SessionError> {
        let (_, envelope) = self
            .exchange(self.client.post(self.url("")).json(&ActorRequest::new(actor.to_string())))
            .await?;
        if !envelope.success {
            warn!(error = %envelope.error_message(), "Create rejected by service");
            return Err(SessionErrorKind::CreateRejected(envelope.error_message()).into());
        }
        let id = envelope
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SessionError::network("malformed response: missing session id"))?;
        let game = envelope.into_state(&id)?;
        info!(session_id = %id, "Session created");
        Ok(Created { id, game })
    }

    #[instrument(skip(self))]
    async fn join(&self, id: &str, actor: &str) -> Result<Joined, SessionError> {
        let (_, envelope) = self
            .exchange(
                self.client
                    .post(self.url(&format!("/{}/join", id)))
                    .json(&ActorRequest::new(actor.to_string())),
            )
            .await?;
        if !envelope.success {
            warn!(error = %envelope.error_message(), "Join rejected by service");
            return Err(SessionErrorKind::JoinRejected(envelope.error_message()).into());
        }
        let side = envelope.side;
        let game = envelope.into_state(id)?;
        info!(side = ?side, "Session joined");
        Ok(Joined { side, game })
    }

    #[instrument(skip(self))]
    async fn submit_move(
        &self,
        id: &str,
        actor: &str,
        index: usize,
    ) -> Result<GameState, SessionError> {
        let (_, envelope) = self
            .exchange(
                self.client
                    .post(self.url(&format!("/{}/move", id)))
                    .json(&MoveRequest::new(actor.to_string(), index)),
            )
            .await?;
        if !envelope.success {
            warn!(error = %envelope.error_message(), "Move rejected by service");
            return Err(SessionErrorKind::MoveRejected(envelope.error_message()).into());
        }
        envelope.into_state(id)
    }

    #[instrument(skip(self))]
    async fn state(&self, id: &str) -> Result<GameState, SessionError> {
        let (status, envelope) = self
            .exchange(self.client.get(self.url(&format!("/{}", id))))
            .await?;
        if !envelope.success {
            if is_not_found(status, &envelope) {
                return Err(SessionErrorKind::SessionNotFound(id.to_string()).into());
            }
            return Err(SessionError::network(envelope.error_message()));
        }
        envelope.into_state(id)
    }
}
