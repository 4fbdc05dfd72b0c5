//! Stand-in backend used when no endpoint is configured
//!
//! Lets the client be exercised locally: every criterion is reported open,
//! there are no scores, writes are logged and acknowledged, and logins fail
//! because there is nothing to verify against.

use tracing::info;

use super::wire::VoteSubmission;
use super::{ApiError, Backend};
use crate::game_state::GameState;
use crate::scores::ScoreRecord;
use crate::session::User;

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

impl Backend for OfflineBackend {
    fn verify_login(&self, _username: &str, _password: &str) -> Result<User, ApiError> {
        Err(ApiError::NotConfigured)
    }

    fn get_scores(&self) -> Result<Vec<ScoreRecord>, ApiError> {
        Ok(Vec::new())
    }

    fn get_game_state(&self) -> Result<GameState, ApiError> {
        Ok(GameState::all_open())
    }

    fn update_game_state(&self, state: &GameState) -> Result<(), ApiError> {
        info!(
            active = ?state.active_criteria,
            published = state.results_published,
            "offline updateGameState"
        );
        Ok(())
    }

    fn submit_vote(&self, vote: &VoteSubmission) -> Result<(), ApiError> {
        info!(
            panelist = %vote.panelist_id,
            scores = ?vote.scores,
            "offline submitVote"
        );
        Ok(())
    }
}
