//! Safe-default wrappers around backend calls
//!
//! Transport failures, backend rejections and misconfiguration are all
//! logged and collapsed into a default the caller can render: an empty score
//! list, a closed unpublished state, or `false` for writes.

use tracing::warn;

use super::wire::VoteSubmission;
use super::Backend;
use crate::game_state::GameState;
use crate::scores::ScoreRecord;

pub trait SafeCalls {
    fn scores_or_empty(&self) -> Vec<ScoreRecord>;

    fn game_state_or_default(&self) -> GameState;

    /// Push the state; `false` if the push failed. No rollback is attempted.
    fn push_game_state(&self, state: &GameState) -> bool;

    fn submit_vote_or_false(&self, vote: &VoteSubmission) -> bool;
}

impl<B: Backend + ?Sized> SafeCalls for B {
    fn scores_or_empty(&self) -> Vec<ScoreRecord> {
        self.get_scores().unwrap_or_else(|e| {
            warn!(error = %e, "getScores failed");
            Vec::new()
        })
    }

    fn game_state_or_default(&self) -> GameState {
        self.get_game_state().unwrap_or_else(|e| {
            warn!(error = %e, "getGameState failed");
            GameState::default()
        })
    }

    fn push_game_state(&self, state: &GameState) -> bool {
        match self.update_game_state(state) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "updateGameState failed; backend may be out of sync");
                false
            }
        }
    }

    fn submit_vote_or_false(&self, vote: &VoteSubmission) -> bool {
        match self.submit_vote(vote) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, panelist = %vote.panelist_id, "submitVote failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::session::User;

    struct Down;

    impl Backend for Down {
        fn verify_login(&self, _: &str, _: &str) -> Result<User, ApiError> {
            Err(ApiError::Transport("down".into()))
        }
        fn get_scores(&self) -> Result<Vec<ScoreRecord>, ApiError> {
            Err(ApiError::Transport("down".into()))
        }
        fn get_game_state(&self) -> Result<GameState, ApiError> {
            Err(ApiError::Status(502))
        }
        fn update_game_state(&self, _: &GameState) -> Result<(), ApiError> {
            Err(ApiError::Rejected("locked".into()))
        }
        fn submit_vote(&self, _: &VoteSubmission) -> Result<(), ApiError> {
            Err(ApiError::NotConfigured)
        }
    }

    #[test]
    fn test_failures_collapse_to_defaults() {
        let backend: &dyn Backend = &Down;
        assert!(backend.scores_or_empty().is_empty());
        assert_eq!(backend.game_state_or_default(), GameState::default());
        assert!(!backend.push_game_state(&GameState::all_open()));

        let vote = VoteSubmission {
            panelist_id: "p".into(),
            panelist_name: "P".into(),
            scores: Default::default(),
        };
        assert!(!backend.submit_vote_or_false(&vote));
    }
}
