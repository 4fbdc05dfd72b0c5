//! Scoring backend client
//!
//! The backend is a single HTTP endpoint dispatching on an `action`
//! parameter. [`Backend`] abstracts its five operations; [`HttpBackend`]
//! talks to the real endpoint and [`OfflineBackend`] stands in when no
//! endpoint is configured. [`SafeCalls`] converts failures into the safe
//! defaults callers render.

mod http;
mod offline;
mod safe;
mod wire;

pub use http::HttpBackend;
pub use offline::OfflineBackend;
pub use safe::SafeCalls;
pub use wire::{decode_ack, decode_game_state, decode_login, decode_scores, VoteSubmission};

use crate::config::ClientConfig;
use crate::game_state::GameState;
use crate::scores::ScoreRecord;
use crate::session::User;

/// Backend failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("API not configured")]
    NotConfigured,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("rejected by backend: {0}")]
    Rejected(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Operations exposed by the scoring backend
pub trait Backend: Send + Sync {
    /// Check credentials; `Rejected` carries the backend's message
    fn verify_login(&self, username: &str, password: &str) -> Result<User, ApiError>;

    fn get_scores(&self) -> Result<Vec<ScoreRecord>, ApiError>;

    fn get_game_state(&self) -> Result<GameState, ApiError>;

    /// Push the full state; last write wins on the backend
    fn update_game_state(&self, state: &GameState) -> Result<(), ApiError>;

    /// Upsert a panelist's scores
    fn submit_vote(&self, vote: &VoteSubmission) -> Result<(), ApiError>;
}

/// Build the backend for a configuration: HTTP when an endpoint is set,
/// offline otherwise.
pub fn connect(config: &ClientConfig) -> Box<dyn Backend> {
    if config.is_configured() {
        tracing::debug!(endpoint = %config.endpoint, "using HTTP backend");
        Box::new(HttpBackend::new(config))
    } else {
        tracing::warn!("backend endpoint not set; running against offline backend");
        Box::new(OfflineBackend)
    }
}
