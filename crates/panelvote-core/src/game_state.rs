//! Shared game state and the client-side revisioned cache
//!
//! The backend holds a single [`GameState`]. Clients keep a cached copy in a
//! [`StateCache`], which assigns a revision to every change. Fetches are
//! tagged with a [`FetchTicket`] when issued so that a response which was
//! overtaken by a newer fetch, or by a local write, is discarded instead of
//! overwriting fresher data.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::criteria::Criterion;

/// Which criteria are open and whether results are published
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default, deserialize_with = "known_criteria")]
    pub active_criteria: BTreeSet<Criterion>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub results_published: bool,
}

impl GameState {
    /// State with every criterion open and results unpublished
    pub fn all_open() -> Self {
        Self {
            active_criteria: Criterion::ALL.into_iter().collect(),
            results_published: false,
        }
    }

    pub fn is_open(&self, criterion: Criterion) -> bool {
        self.active_criteria.contains(&criterion)
    }

    /// Open the criterion if closed, close it if open. Returns the new
    /// open/closed status.
    pub fn toggle_criterion(&mut self, criterion: Criterion) -> bool {
        if self.active_criteria.remove(&criterion) {
            false
        } else {
            self.active_criteria.insert(criterion);
            true
        }
    }

    /// Flip the published flag, returning the new value
    pub fn toggle_published(&mut self) -> bool {
        self.results_published = !self.results_published;
        self.results_published
    }

    /// Open criteria in catalogue order
    pub fn votable(&self) -> Vec<Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(|c| self.active_criteria.contains(c))
            .collect()
    }
}

fn known_criteria<'de, D>(deserializer: D) -> Result<BTreeSet<Criterion>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    let mut set = BTreeSet::new();
    for id in ids {
        match Criterion::from_id(id.trim()) {
            Some(criterion) => {
                set.insert(criterion);
            }
            None => warn!(criterion = %id, "ignoring unknown criterion from backend"),
        }
    }
    Ok(set)
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s.eq_ignore_ascii_case("true"),
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    })
}

/// Issued before a fetch; presented back to [`StateCache::apply_fetched`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    issued_at: u64,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Outcome of applying a fetched state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// State differs from the cached one; revision was bumped
    Changed { previous: Option<GameState> },
    /// State identical to the cache
    Unchanged,
    /// Response was overtaken by a newer fetch or a local write
    Stale,
}

/// Revisioned client-side copy of the shared game state.
///
/// The CLI gives the poll loop and the admin console separate caches, so
/// there a fetch never races a local write. The write guard applies to
/// embedders that share one cache between polling and local toggles
/// (fetch in flight while a toggle lands).
#[derive(Debug, Clone, Default)]
pub struct StateCache {
    state: Option<GameState>,
    revision: u64,
    next_seq: u64,
    last_applied_seq: u64,
    last_write_revision: u64,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache seeded with a known state (revision 1)
    pub fn with_state(state: GameState) -> Self {
        Self {
            state: Some(state),
            revision: 1,
            ..Self::default()
        }
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Tag an outgoing fetch
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.next_seq += 1;
        FetchTicket {
            seq: self.next_seq,
            issued_at: self.revision,
        }
    }

    /// Apply a fetched state if it is still the freshest information.
    pub fn apply_fetched(&mut self, ticket: FetchTicket, fetched: GameState) -> Applied {
        if ticket.seq <= self.last_applied_seq {
            debug!(seq = ticket.seq, last = self.last_applied_seq, "dropping overtaken fetch");
            return Applied::Stale;
        }
        if ticket.issued_at < self.last_write_revision {
            debug!(seq = ticket.seq, "dropping fetch issued before local write");
            return Applied::Stale;
        }
        self.last_applied_seq = ticket.seq;

        if self.state.as_ref() == Some(&fetched) {
            return Applied::Unchanged;
        }
        let previous = self.state.replace(fetched);
        self.revision += 1;
        Applied::Changed { previous }
    }

    /// Apply a local mutation (admin toggle). Always wins over in-flight
    /// fetches issued before it.
    pub fn write_local<F>(&mut self, mutate: F) -> GameState
    where
        F: FnOnce(&mut GameState),
    {
        let mut state = self.state.clone().unwrap_or_default();
        mutate(&mut state);
        self.state = Some(state.clone());
        self.revision += 1;
        self.last_write_revision = self.revision;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_state_is_closed_and_unpublished() {
        let state = GameState::default();
        assert!(state.active_criteria.is_empty());
        assert!(!state.results_published);
        assert!(state.votable().is_empty());
    }

    #[test]
    fn test_toggle_criterion_is_set_toggle() {
        let mut state = GameState::default();
        assert!(state.toggle_criterion(Criterion::Yontem));
        assert!(state.is_open(Criterion::Yontem));
        assert!(!state.toggle_criterion(Criterion::Yontem));
        assert!(!state.is_open(Criterion::Yontem));

        state.toggle_criterion(Criterion::Yontem);
        state.toggle_criterion(Criterion::OzgunDeger);
        assert_eq!(state.active_criteria.len(), 2);
        assert_eq!(state.votable(), vec![Criterion::OzgunDeger, Criterion::Yontem]);
    }

    #[test]
    fn test_decode_wire_state() {
        let state: GameState = serde_json::from_value(json!({
            "activeCriteria": ["yontem", "ozgun_deger", "yontem", "butce"],
            "resultsPublished": true
        }))
        .unwrap();
        assert_eq!(state.votable(), vec![Criterion::OzgunDeger, Criterion::Yontem]);
        assert!(state.results_published);
    }

    #[test]
    fn test_decode_missing_fields_defaults() {
        let state: GameState = serde_json::from_value(json!({})).unwrap();
        assert_eq!(state, GameState::default());

        let state: GameState = serde_json::from_value(json!({
            "activeCriteria": null,
            "resultsPublished": "TRUE"
        }))
        .unwrap();
        assert!(state.active_criteria.is_empty());
        assert!(state.results_published);
    }

    #[test]
    fn test_encode_wire_state() {
        let mut state = GameState::default();
        state.toggle_criterion(Criterion::YayginEtki);
        state.toggle_criterion(Criterion::OzgunDeger);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            value,
            json!({"activeCriteria": ["ozgun_deger", "yaygin_etki"], "resultsPublished": false})
        );
    }

    #[test]
    fn test_cache_applies_fresh_fetch() {
        let mut cache = StateCache::new();
        let ticket = cache.begin_fetch();
        let applied = cache.apply_fetched(ticket, GameState::all_open());
        assert_eq!(applied, Applied::Changed { previous: None });
        assert_eq!(cache.revision(), 1);

        let ticket = cache.begin_fetch();
        assert_eq!(cache.apply_fetched(ticket, GameState::all_open()), Applied::Unchanged);
        assert_eq!(cache.revision(), 1);
    }

    #[test]
    fn test_cache_drops_overtaken_fetch() {
        let mut cache = StateCache::new();
        let older = cache.begin_fetch();
        let newer = cache.begin_fetch();

        let mut published = GameState::all_open();
        published.results_published = true;
        cache.apply_fetched(newer, published.clone());

        assert_eq!(cache.apply_fetched(older, GameState::default()), Applied::Stale);
        assert_eq!(cache.state(), Some(&published));
    }

    #[test]
    fn test_cache_local_write_beats_in_flight_fetch() {
        let mut cache = StateCache::with_state(GameState::default());
        let in_flight = cache.begin_fetch();

        let written = cache.write_local(|s| {
            s.toggle_criterion(Criterion::Yontem);
        });
        assert!(written.is_open(Criterion::Yontem));

        assert_eq!(cache.apply_fetched(in_flight, GameState::default()), Applied::Stale);
        assert!(cache.state().unwrap().is_open(Criterion::Yontem));

        let after = cache.begin_fetch();
        assert!(matches!(
            cache.apply_fetched(after, GameState::default()),
            Applied::Changed { .. }
        ));
    }
}
