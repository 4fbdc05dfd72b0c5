//! A panelist's in-progress ballot

use std::collections::BTreeMap;

use tracing::info;

use crate::api::{Backend, SafeCalls, VoteSubmission};
use crate::criteria::{clamp_score, Criterion, MIN_SCORE};
use crate::error::{PanelError, Result};
use crate::game_state::GameState;
use crate::session::User;

/// Scores the panelist is about to submit.
///
/// A fresh ballot starts every criterion at the minimum score; one resumed
/// with [`Ballot::from_scores`] keeps earlier scores. Only criteria open in
/// the current game state may be changed. Submitting twice is allowed; the
/// backend upserts by panelist id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    scores: BTreeMap<Criterion, u8>,
    submitted: bool,
}

impl Default for Ballot {
    fn default() -> Self {
        Self {
            scores: Criterion::ALL.into_iter().map(|c| (c, MIN_SCORE)).collect(),
            submitted: false,
        }
    }
}

impl Ballot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from scores submitted earlier. Values are clamped and missing
    /// criteria start at the minimum.
    pub fn from_scores(previous: &BTreeMap<Criterion, u8>) -> Self {
        let mut ballot = Self::default();
        for (criterion, score) in previous {
            ballot
                .scores
                .insert(*criterion, clamp_score(i64::from(*score)));
        }
        ballot
    }

    /// Set a score, clamped to the valid range. Rejected when the criterion
    /// is not open in `state`.
    pub fn set_score(&mut self, state: &GameState, criterion: Criterion, score: i64) -> Result<u8> {
        if !state.is_open(criterion) {
            return Err(PanelError::CriterionClosed {
                criterion: criterion.id().to_string(),
            });
        }
        let clamped = clamp_score(score);
        self.scores.insert(criterion, clamped);
        Ok(clamped)
    }

    pub fn score(&self, criterion: Criterion) -> u8 {
        self.scores.get(&criterion).copied().unwrap_or(MIN_SCORE)
    }

    /// Full score mapping, as sent to the backend
    pub fn scores(&self) -> &BTreeMap<Criterion, u8> {
        &self.scores
    }

    /// Criteria the panelist may vote on right now, in catalogue order.
    /// Closed criteria never appear, whatever was scored before.
    pub fn votable(&self, state: &GameState) -> Vec<(Criterion, u8)> {
        state
            .votable()
            .into_iter()
            .map(|c| (c, self.score(c)))
            .collect()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    /// Payload for the backend; the panelist id is the username
    pub fn submission(&self, user: &User) -> VoteSubmission {
        VoteSubmission {
            panelist_id: user.username.clone(),
            panelist_name: user.name.clone(),
            scores: self.scores.clone(),
        }
    }

    /// Send the ballot. Returns whether the backend accepted it; on failure
    /// the ballot stays unsubmitted so it can be sent again.
    pub fn submit(&mut self, backend: &dyn Backend, user: &User) -> bool {
        let accepted = backend.submit_vote_or_false(&self.submission(user));
        if accepted {
            info!(panelist = %user.username, "ballot submitted");
            self.mark_submitted();
        }
        accepted
    }
}
