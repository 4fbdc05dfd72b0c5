//! Administrator controls
//!
//! Toggles are applied to the local cache first and then pushed to the
//! backend as a full state. A failed push is reported but not rolled back;
//! the next successful push or poll brings both sides together again.

use serde::Serialize;
use tracing::info;

use crate::api::{ApiError, Backend, SafeCalls};
use crate::criteria::Criterion;
use crate::game_state::{GameState, StateCache};

/// Result of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    /// New value (open / published)
    pub enabled: bool,
    /// Whether the backend acknowledged the push
    pub pushed: bool,
}

pub struct AdminConsole<'a> {
    backend: &'a dyn Backend,
    cache: StateCache,
}

impl<'a> AdminConsole<'a> {
    /// Fetch the current state. Unlike panelist views, an unknown state is
    /// an error here: toggling on top of a default would overwrite the
    /// backend with it.
    pub fn load(backend: &'a dyn Backend) -> Result<Self, ApiError> {
        let state = backend.get_game_state()?;
        Ok(Self::with_state(backend, state))
    }

    pub fn with_state(backend: &'a dyn Backend, state: GameState) -> Self {
        Self {
            backend,
            cache: StateCache::with_state(state),
        }
    }

    pub fn state(&self) -> GameState {
        self.cache.state().cloned().unwrap_or_default()
    }

    pub fn revision(&self) -> u64 {
        self.cache.revision()
    }

    /// Open or close a criterion and push the new state
    pub fn toggle_criterion(&mut self, criterion: Criterion) -> ToggleOutcome {
        let mut enabled = false;
        let state = self.cache.write_local(|s| enabled = s.toggle_criterion(criterion));
        info!(criterion = %criterion, open = enabled, "criterion toggled");
        ToggleOutcome {
            enabled,
            pushed: self.backend.push_game_state(&state),
        }
    }

    /// Publish or unpublish results and push the new state
    pub fn toggle_publish(&mut self) -> ToggleOutcome {
        let mut enabled = false;
        let state = self.cache.write_local(|s| enabled = s.toggle_published());
        info!(published = enabled, "publish toggled");
        ToggleOutcome {
            enabled,
            pushed: self.backend.push_game_state(&state),
        }
    }
}
