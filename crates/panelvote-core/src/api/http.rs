//! HTTP backend over a single `action`-dispatched endpoint
//!
//! Reads are GET requests with query parameters, writes are POSTs with a JSON
//! body. The body is sent as `text/plain` so script-hosted endpoints accept
//! it without a preflight. No retries: a failed call is reported once.

use std::time::Duration;

use tracing::{debug, trace};
use ureq::Agent;

use super::wire::{self, SubmitVoteRequest, UpdateGameStateRequest, VoteSubmission};
use super::{ApiError, Backend};
use crate::config::ClientConfig;
use crate::game_state::GameState;
use crate::scores::ScoreRecord;
use crate::session::User;

pub struct HttpBackend {
    url: String,
    agent: Agent,
    user_agent: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .http_status_as_error(false)
            .build();
        let user_agent = format!(
            "panelvote/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );

        Self {
            url: config.endpoint.clone(),
            agent: Agent::new_with_config(agent_config),
            user_agent,
        }
    }

    fn get(&self, action: &str, params: &[(&str, &str)]) -> Result<String, ApiError> {
        debug!(action, "GET");
        let mut request = self
            .agent
            .get(self.url.as_str())
            .header("User-Agent", self.user_agent.as_str())
            .query("action", action);
        for (key, value) in params {
            request = request.query(*key, *value);
        }
        let response = request.call();
        read_body(action, response)
    }

    fn post(&self, action: &str, payload: &impl serde::Serialize) -> Result<String, ApiError> {
        debug!(action, "POST");
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = self
            .agent
            .post(self.url.as_str())
            .header("User-Agent", self.user_agent.as_str())
            .header("Content-Type", "text/plain;charset=utf-8")
            .send(body.as_bytes());
        read_body(action, response)
    }
}

fn read_body(
    action: &str,
    response: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<String, ApiError> {
    let mut response = match response {
        Ok(response) => response,
        Err(ureq::Error::StatusCode(code)) => return Err(ApiError::Status(code)),
        Err(e) => return Err(ApiError::Transport(e.to_string())),
    };

    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        return Err(ApiError::Status(status));
    }

    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    trace!(action, bytes = body.len(), "response body");
    Ok(body)
}

impl Backend for HttpBackend {
    fn verify_login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let body = self.get(
            "verifyLogin",
            &[("username", username), ("password", password)],
        )?;
        wire::decode_login(&body)
    }

    fn get_scores(&self) -> Result<Vec<ScoreRecord>, ApiError> {
        let body = self.get("getScores", &[])?;
        wire::decode_scores(&body)
    }

    fn get_game_state(&self) -> Result<GameState, ApiError> {
        let body = self.get("getGameState", &[])?;
        wire::decode_game_state(&body)
    }

    fn update_game_state(&self, state: &GameState) -> Result<(), ApiError> {
        let body = self.post(
            "updateGameState",
            &UpdateGameStateRequest {
                action: "updateGameState",
                state,
            },
        )?;
        wire::decode_ack(&body)
    }

    fn submit_vote(&self, vote: &VoteSubmission) -> Result<(), ApiError> {
        let body = self.post(
            "submitVote",
            &SubmitVoteRequest {
                action: "submitVote",
                vote,
            },
        )?;
        wire::decode_ack(&body)
    }
}
