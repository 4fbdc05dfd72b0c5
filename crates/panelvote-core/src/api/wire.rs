//! Request and response bodies exchanged with the backend

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiError;
use crate::criteria::Criterion;
use crate::game_state::GameState;
use crate::scores::ScoreRecord;
use crate::session::{Role, User};

/// Body of a `submitVote` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSubmission {
    pub panelist_id: String,
    pub panelist_name: String,
    pub scores: BTreeMap<Criterion, u8>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateGameStateRequest<'a> {
    pub action: &'static str,
    #[serde(flatten)]
    pub state: &'a GameState,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitVoteRequest<'a> {
    pub action: &'static str,
    #[serde(flatten)]
    pub vote: &'a VoteSubmission,
}

#[derive(Debug, Deserialize)]
struct Ack {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

impl Ack {
    fn failure_reason(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        match &self.error {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "backend reported failure".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireUser {
    username: String,
    role: Role,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(flatten)]
    ack: Ack,
    #[serde(default)]
    user: Option<WireUser>,
}

fn parse(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// A failure object (`{"success": false, ...}`) where data was expected
fn rejected(value: &Value) -> Option<ApiError> {
    let ack: Ack = serde_json::from_value(value.clone()).ok()?;
    let looks_like_ack = value.get("success").is_some() || value.get("error").is_some();
    (looks_like_ack && !ack.success).then(|| ApiError::Rejected(ack.failure_reason()))
}

/// Decode a `{success, message?}` acknowledgement
pub fn decode_ack(body: &str) -> Result<(), ApiError> {
    let ack: Ack = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if ack.success {
        Ok(())
    } else {
        Err(ApiError::Rejected(ack.failure_reason()))
    }
}

/// Decode the `getScores` array
pub fn decode_scores(body: &str) -> Result<Vec<ScoreRecord>, ApiError> {
    let value = parse(body)?;
    if value.is_object() {
        if let Some(err) = rejected(&value) {
            return Err(err);
        }
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode the `getGameState` object
pub fn decode_game_state(body: &str) -> Result<GameState, ApiError> {
    let value = parse(body)?;
    if value.get("activeCriteria").is_none() {
        if let Some(err) = rejected(&value) {
            return Err(err);
        }
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode the `verifyLogin` response
pub fn decode_login(body: &str) -> Result<User, ApiError> {
    let response: LoginResponse =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if !response.ack.success {
        return Err(ApiError::Rejected(response.ack.failure_reason()));
    }
    let user = response
        .user
        .ok_or_else(|| ApiError::Decode("login succeeded without user".to_string()))?;
    Ok(User {
        name: user.name.unwrap_or_else(|| user.username.clone()),
        username: user.username,
        role: user.role,
    })
}
