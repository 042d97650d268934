//! Remote session client
//!
//! [`RemoteSession`] is the seam between the session controller's requests
//! and the game authority. Each operation is one request/response exchange;
//! nothing here retries or recovers. Rejections come back as
//! [`SyncError::Remote`] with the authority's message untouched, everything
//! else that goes wrong on the wire is [`SyncError::Transport`].

use crate::core::error::{SyncError, SyncResult};
use crate::core::settings::{ClientSettings, SessionConfig};
use crate::game::session::{Reply, Request};
use crate::game::types::{ClockReading, GameSnapshot};
use crate::networking::protocol::{
    ConfigRequest, Envelope, ErrorBody, MoveRequest, SnapshotWire, StatusAck, TimeWire,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Operations the game authority offers a client
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Play `notation` and return the resulting state
    async fn submit_move(&self, notation: &str) -> SyncResult<GameSnapshot>;

    /// Let the authority's engine move for the side to play
    async fn request_ai_move(&self) -> SyncResult<GameSnapshot>;

    /// Start a new game; the new state must be fetched separately
    async fn reset_session(&self, config: SessionConfig) -> SyncResult<()>;

    /// Change difficulty without touching the board
    async fn configure(&self, config: SessionConfig) -> SyncResult<()>;

    /// Current state without moving
    async fn fetch_snapshot(&self) -> SyncResult<GameSnapshot>;

    async fn poll_clocks(&self) -> SyncResult<ClockReading>;
}

/// Run one controller request against the authority
pub async fn dispatch(remote: &dyn RemoteSession, request: &Request) -> SyncResult<Reply> {
    match request {
        Request::SubmitMove { notation } => remote.submit_move(notation).await.map(Reply::Snapshot),
        Request::AiMove => remote.request_ai_move().await.map(Reply::Snapshot),
        Request::Reset { config } => remote.reset_session(*config).await.map(|_| Reply::Acknowledged),
        Request::Configure { config } => remote.configure(*config).await.map(|_| Reply::Acknowledged),
        Request::FetchSnapshot => remote.fetch_snapshot().await.map(Reply::Snapshot),
        Request::PollClocks => remote.poll_clocks().await.map(Reply::Clocks),
    }
}

/// [`RemoteSession`] over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpSessionClient {
    http: reqwest::Client,
    base: Url,
}

impl HttpSessionClient {
    pub fn new(server_url: &str, timeout: Duration) -> SyncResult<Self> {
        let mut base = Url::parse(server_url)
            .map_err(|e| SyncError::transport(format!("invalid server URL '{server_url}': {e}")))?;
        // Joining relative endpoints keeps any path prefix only with a trailing slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        info!("[NETWORK] Session client targeting {}", base);
        Ok(Self { http, base })
    }

    pub fn from_settings(settings: &ClientSettings) -> SyncResult<Self> {
        Self::new(&settings.server_url, settings.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> SyncResult<Url> {
        self.base
            .join(path)
            .map_err(|e| SyncError::transport(format!("invalid endpoint '{path}': {e}")))
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        label: &str,
        request: reqwest::RequestBuilder,
    ) -> SyncResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("[NETWORK] {} -> {} ({} bytes)", label, status, body.len());

        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(Envelope::Rejected(ErrorBody { error })) => Err(SyncError::Remote { message: error }),
            Ok(Envelope::Payload(payload)) if status.is_success() => Ok(payload),
            Ok(Envelope::Payload(_)) => Err(SyncError::transport(format!("{label}: HTTP {status}"))),
            Err(e) if status.is_success() => Err(SyncError::transport(format!(
                "{label}: unreadable reply: {e}"
            ))),
            Err(_) => Err(SyncError::transport(format!("{label}: HTTP {status}"))),
        }
    }

    async fn post_move(&self, body: MoveRequest) -> SyncResult<GameSnapshot> {
        let url = self.endpoint("move")?;
        let wire: SnapshotWire = self.exchange("move", self.http.post(url).json(&body)).await?;
        Ok(wire.into())
    }

    async fn post_config(&self, path: &str, config: SessionConfig) -> SyncResult<()> {
        let url = self.endpoint(path)?;
        let body = ConfigRequest::from(config);
        let ack: StatusAck = self.exchange(path, self.http.post(url).json(&body)).await?;
        if ack.status == "ok" {
            Ok(())
        } else {
            Err(SyncError::Remote {
                message: ack.status,
            })
        }
    }
}

#[async_trait]
impl RemoteSession for HttpSessionClient {
    async fn submit_move(&self, notation: &str) -> SyncResult<GameSnapshot> {
        self.post_move(MoveRequest::new(notation)).await
    }

    async fn request_ai_move(&self) -> SyncResult<GameSnapshot> {
        let url = self.endpoint("ai_move")?;
        let wire: SnapshotWire = self.exchange("ai_move", self.http.get(url)).await?;
        Ok(wire.into())
    }

    async fn reset_session(&self, config: SessionConfig) -> SyncResult<()> {
        self.post_config("reset", config).await
    }

    async fn configure(&self, config: SessionConfig) -> SyncResult<()> {
        self.post_config("set_difficulty", config).await
    }

    async fn fetch_snapshot(&self) -> SyncResult<GameSnapshot> {
        self.post_move(MoveRequest::initial()).await
    }

    async fn poll_clocks(&self) -> SyncResult<ClockReading> {
        let url = self.endpoint("get_time")?;
        let wire: TimeWire = self.exchange("get_time", self.http.get(url)).await?;
        Ok(wire.into())
    }
}
