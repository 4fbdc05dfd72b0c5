use std::fmt;

use serde::Serialize;

use crate::game_state::GameState;

/// What a session should be showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    /// No criterion is open yet
    AwaitingCriteria,
    /// At least one criterion open, results not published
    Voting,
    /// Results are visible
    ResultsPublished,
}

impl ViewPhase {
    pub fn from_state(state: &GameState) -> Self {
        if state.results_published {
            ViewPhase::ResultsPublished
        } else if state.active_criteria.is_empty() {
            ViewPhase::AwaitingCriteria
        } else {
            ViewPhase::Voting
        }
    }
}

impl fmt::Display for ViewPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewPhase::AwaitingCriteria => "awaiting criteria",
            ViewPhase::Voting => "voting",
            ViewPhase::ResultsPublished => "results published",
        };
        f.write_str(name)
    }
}
