//! Game-state sync loop
//!
//! [`GameSync`] is the per-session state machine: it consumes polled game
//! states, tracks the [`ViewPhase`], and decides when scores must be fetched.
//! [`spawn_poller`] drives it on a worker thread at a fixed interval.

mod phase;
mod poller;

pub use phase::ViewPhase;
pub use poller::{spawn_poller, PollHandle};

use tracing::{debug, info, warn};

use crate::api::{Backend, SafeCalls};
use crate::criteria::Criterion;
use crate::game_state::{Applied, FetchTicket, GameState, StateCache};
use crate::scores::ScoreRecord;

/// Something the session should react to
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    PhaseChanged {
        from: Option<ViewPhase>,
        to: ViewPhase,
    },
    /// Open criteria changed; carries the new open set in catalogue order
    CriteriaChanged(Vec<Criterion>),
    ResultsFetched(Vec<ScoreRecord>),
    /// The poll failed; the previous snapshot is kept
    PollFailed(String),
}

/// Result of observing one polled state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub events: Vec<SyncEvent>,
    /// Set exactly when results flipped from unpublished to published
    pub fetch_scores: bool,
}

#[derive(Debug, Default)]
pub struct GameSync {
    cache: StateCache,
    phase: Option<ViewPhase>,
    results: Vec<ScoreRecord>,
}

impl GameSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Option<ViewPhase> {
        self.phase
    }

    pub fn state(&self) -> Option<&GameState> {
        self.cache.state()
    }

    pub fn revision(&self) -> u64 {
        self.cache.revision()
    }

    /// Last fetched results (empty until results are published)
    pub fn results(&self) -> &[ScoreRecord] {
        &self.results
    }

    /// Tag a game-state fetch about to be issued
    pub fn begin_poll(&mut self) -> FetchTicket {
        self.cache.begin_fetch()
    }

    /// Feed a fetched state back in
    pub fn observe(&mut self, ticket: FetchTicket, fetched: GameState) -> Observation {
        let previous = match self.cache.apply_fetched(ticket, fetched) {
            Applied::Stale | Applied::Unchanged => return Observation::default(),
            Applied::Changed { previous } => previous,
        };
        let Some(current) = self.cache.state().cloned() else {
            return Observation::default();
        };

        let mut observation = Observation::default();

        let was_published = previous.as_ref().is_some_and(|s| s.results_published);
        if !was_published && current.results_published {
            observation.fetch_scores = true;
        }
        if was_published && !current.results_published {
            self.results.clear();
        }

        if previous.as_ref().map(|s| &s.active_criteria) != Some(&current.active_criteria) {
            observation
                .events
                .push(SyncEvent::CriteriaChanged(current.votable()));
        }

        let phase = ViewPhase::from_state(&current);
        if self.phase != Some(phase) {
            info!(from = ?self.phase, to = %phase, "phase changed");
            observation.events.push(SyncEvent::PhaseChanged {
                from: self.phase,
                to: phase,
            });
            self.phase = Some(phase);
        }

        observation
    }

    /// One full poll cycle against `backend`: fetch the state, observe it,
    /// and fetch scores once if results were just published.
    pub fn poll<B: Backend + ?Sized>(&mut self, backend: &B) -> Vec<SyncEvent> {
        let ticket = self.begin_poll();
        debug!(seq = ticket.seq(), "polling game state");

        let fetched = match backend.get_game_state() {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "poll failed; keeping last snapshot");
                return vec![SyncEvent::PollFailed(e.to_string())];
            }
        };

        let mut observation = self.observe(ticket, fetched);
        if observation.fetch_scores {
            let records = backend.scores_or_empty();
            info!(records = records.len(), "results fetched");
            self.results = records.clone();
            observation.events.push(SyncEvent::ResultsFetched(records));
        }
        observation.events
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use crate::api::ApiError;

    fn state(open: &[Criterion], published: bool) -> GameState {
        GameState {
            active_criteria: open.iter().copied().collect(),
            results_published: published,
        }
    }

    #[test]
    fn test_first_poll_sets_phase() {
        let backend = ScriptedBackend::new(vec![Ok(state(&[], false))], vec![]);
        let mut sync = GameSync::new();
        let events = sync.poll(&backend);

        assert_eq!(sync.phase(), Some(ViewPhase::AwaitingCriteria));
        assert!(events.contains(&SyncEvent::PhaseChanged {
            from: None,
            to: ViewPhase::AwaitingCriteria
        }));
        assert_eq!(backend.score_fetches(), 0);
    }

    #[test]
    fn test_publish_fetches_scores_once_per_transition() {
        let records = vec![ScoreRecord::uniform("a", 4)];
        let backend = ScriptedBackend::new(
            vec![
                Ok(state(&[Criterion::Yontem], false)),
                Ok(state(&[Criterion::Yontem], true)),
                Ok(state(&[Criterion::Yontem], true)),
                Ok(state(&[Criterion::Yontem], true)),
            ],
            records.clone(),
        );
        let mut sync = GameSync::new();

        sync.poll(&backend);
        assert_eq!(sync.phase(), Some(ViewPhase::Voting));

        let events = sync.poll(&backend);
        assert!(events.contains(&SyncEvent::ResultsFetched(records.clone())));
        assert_eq!(sync.phase(), Some(ViewPhase::ResultsPublished));

        sync.poll(&backend);
        sync.poll(&backend);
        assert_eq!(backend.score_fetches(), 1);
        assert_eq!(sync.results(), records.as_slice());
    }

    #[test]
    fn test_unpublish_reverts_and_republish_fetches_again() {
        let backend = ScriptedBackend::new(
            vec![
                Ok(state(&[Criterion::Yontem], true)),
                Ok(state(&[Criterion::Yontem], false)),
                Ok(state(&[], false)),
                Ok(state(&[], true)),
            ],
            vec![ScoreRecord::uniform("a", 2)],
        );
        let mut sync = GameSync::new();

        sync.poll(&backend);
        assert_eq!(backend.score_fetches(), 1);

        sync.poll(&backend);
        assert_eq!(sync.phase(), Some(ViewPhase::Voting));
        assert!(sync.results().is_empty());

        sync.poll(&backend);
        assert_eq!(sync.phase(), Some(ViewPhase::AwaitingCriteria));

        sync.poll(&backend);
        assert_eq!(sync.phase(), Some(ViewPhase::ResultsPublished));
        assert_eq!(backend.score_fetches(), 2);
    }

    #[test]
    fn test_criteria_change_event() {
        let backend = ScriptedBackend::new(
            vec![
                Ok(state(&[Criterion::Yontem], false)),
                Ok(state(&[Criterion::Yontem, Criterion::OzgunDeger], false)),
            ],
            vec![],
        );
        let mut sync = GameSync::new();
        sync.poll(&backend);
        let events = sync.poll(&backend);
        assert_eq!(
            events,
            vec![SyncEvent::CriteriaChanged(vec![
                Criterion::OzgunDeger,
                Criterion::Yontem
            ])]
        );
    }

    #[test]
    fn test_failed_poll_keeps_snapshot() {
        let backend = ScriptedBackend::new(
            vec![
                Ok(state(&[Criterion::Yontem], false)),
                Err(ApiError::Transport("offline".into())),
            ],
            vec![],
        );
        let mut sync = GameSync::new();
        sync.poll(&backend);
        let events = sync.poll(&backend);

        assert!(matches!(events.as_slice(), [SyncEvent::PollFailed(_)]));
        assert_eq!(sync.phase(), Some(ViewPhase::Voting));
        assert!(sync.state().unwrap().is_open(Criterion::Yontem));
    }

    #[test]
    fn test_stale_response_ignored() {
        let mut sync = GameSync::new();
        let slow = sync.begin_poll();
        let fast = sync.begin_poll();

        let obs = sync.observe(fast, state(&[], true));
        assert!(obs.fetch_scores);

        let obs = sync.observe(slow, state(&[Criterion::Yontem], false));
        assert_eq!(obs, Observation::default());
        assert_eq!(sync.phase(), Some(ViewPhase::ResultsPublished));
    }
}
