//! Fixed-interval poll worker

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace};

use super::{GameSync, SyncEvent};
use crate::api::Backend;

enum Control {
    Refresh,
    Stop,
}

/// Owner of a running poll worker.
///
/// Dropping the handle stops the worker and waits for it, so the timer never
/// outlives the session that started it.
pub struct PollHandle {
    control: Sender<Control>,
    events: Receiver<SyncEvent>,
    worker: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Poll now instead of waiting for the next tick
    pub fn refresh(&self) {
        let _ = self.control.send(Control::Refresh);
    }

    /// Next event, waiting at most `timeout`
    pub fn next_event(&self, timeout: Duration) -> Option<SyncEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Stop the worker and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.control.send(Control::Stop);
            if worker.join().is_err() {
                tracing::error!("poll worker panicked");
            }
            debug!("poll worker stopped");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start polling `backend` every `interval`. The first poll happens
/// immediately.
pub fn spawn_poller(backend: Arc<dyn Backend>, interval: Duration) -> PollHandle {
    let (control_tx, control_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();

    let worker = thread::spawn(move || run(backend.as_ref(), interval, &control_rx, &event_tx));

    PollHandle {
        control: control_tx,
        events: event_rx,
        worker: Some(worker),
    }
}

fn run(
    backend: &dyn Backend,
    interval: Duration,
    control: &Receiver<Control>,
    events: &Sender<SyncEvent>,
) {
    let mut sync = GameSync::new();
    loop {
        for event in sync.poll(backend) {
            if events.send(event).is_err() {
                return;
            }
        }

        match control.recv_timeout(interval) {
            Ok(Control::Refresh) => trace!("manual refresh"),
            Err(RecvTimeoutError::Timeout) => trace!("poll tick"),
            Ok(Control::Stop) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criterion;
    use crate::game_state::GameState;
    use crate::scores::ScoreRecord;
    use crate::sync::testing::ScriptedBackend;
    use crate::sync::ViewPhase;
    use std::sync::atomic::Ordering;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_poller_reports_publish_and_fetches_once() {
        let open = GameState {
            active_criteria: [Criterion::Yontem].into_iter().collect(),
            results_published: false,
        };
        let published = GameState {
            results_published: true,
            ..open.clone()
        };
        let backend = Arc::new(ScriptedBackend::new(
            vec![Ok(open), Ok(published)],
            vec![ScoreRecord::uniform("a", 5)],
        ));

        let handle = spawn_poller(backend.clone(), Duration::from_millis(20));

        let mut saw_results = false;
        while let Some(event) = handle.next_event(WAIT) {
            if let SyncEvent::ResultsFetched(records) = event {
                assert_eq!(records.len(), 1);
                saw_results = true;
                break;
            }
        }
        assert!(saw_results);

        // Let a few more ticks pass on the unchanged published state
        std::thread::sleep(Duration::from_millis(100));
        handle.stop();

        assert_eq!(backend.score_fetches(), 1);
        assert!(backend.state_fetches.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn test_manual_refresh_polls_before_tick() {
        let backend = Arc::new(ScriptedBackend::new(
            vec![Ok(GameState::default()), Ok(GameState::all_open())],
            vec![],
        ));
        let handle = spawn_poller(backend.clone(), Duration::from_secs(60));

        assert_eq!(
            handle.next_event(WAIT),
            Some(SyncEvent::CriteriaChanged(vec![]))
        );
        assert_eq!(
            handle.next_event(WAIT),
            Some(SyncEvent::PhaseChanged {
                from: None,
                to: ViewPhase::AwaitingCriteria
            })
        );

        handle.refresh();
        let mut phases = Vec::new();
        while let Some(event) = handle.next_event(WAIT) {
            if let SyncEvent::PhaseChanged { to, .. } = event {
                phases.push(to);
                break;
            }
        }
        assert_eq!(phases, vec![ViewPhase::Voting]);
    }

    #[test]
    fn test_drop_stops_worker() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(GameState::default())], vec![]));
        let handle = spawn_poller(backend.clone(), Duration::from_millis(10));
        handle.next_event(WAIT);
        drop(handle);

        let after_drop = backend.state_fetches.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(backend.state_fetches.load(Ordering::SeqCst), after_drop);
    }
}
