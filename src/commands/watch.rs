//! `panelvote watch` - follow the game state until interrupted
//!
//! Enter triggers an immediate refresh; Ctrl-C ends the session.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use panelvote_core::api::{self, Backend};
use panelvote_core::error::{PanelError, Result};
use panelvote_core::format::ResultsView;
use panelvote_core::sync::{spawn_poller, SyncEvent};

const EVENT_WAIT: Duration = Duration::from_millis(200);

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let session = ctx.session()?;
    let config = ctx.config()?;
    let backend: Arc<dyn Backend> = Arc::from(api::connect(&config));

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .map_err(|e| PanelError::Other(format!("failed to install Ctrl-C handler: {}", e)))?;

    let refresh_rx = spawn_stdin_reader();
    let poller = spawn_poller(backend, config.poll_interval());

    if ctx.format() == OutputFormat::Human && !ctx.quiet() {
        println!(
            "Watching as {} ({}); Enter to refresh, Ctrl-C to stop",
            session.username(),
            session.role()
        );
    }

    while running.load(Ordering::SeqCst) {
        while refresh_rx.try_recv().is_ok() {
            poller.refresh();
        }
        if let Some(event) = poller.next_event(EVENT_WAIT) {
            print_event(ctx, &event)?;
        }
    }

    debug!("watch interrupted");
    poller.stop();
    Ok(())
}

/// Forward each stdin line as a refresh request. The reader thread is left
/// detached; it ends with stdin.
fn spawn_stdin_reader() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}

fn print_event(ctx: &CommandContext, event: &SyncEvent) -> Result<()> {
    if ctx.format() == OutputFormat::Json {
        println!("{}", serde_json::to_string(&event_json(event))?);
        return Ok(());
    }

    match event {
        SyncEvent::PhaseChanged { to, .. } => println!("phase: {}", to),
        SyncEvent::CriteriaChanged(open) => {
            let ids: Vec<&str> = open.iter().map(|c| c.id()).collect();
            if ids.is_empty() {
                println!("open criteria: none");
            } else {
                println!("open criteria: {}", ids.join(", "));
            }
        }
        SyncEvent::ResultsFetched(records) => {
            if records.is_empty() {
                println!("No votes yet");
            } else {
                print!("{}", ResultsView::new(records, false).render_human());
            }
        }
        SyncEvent::PollFailed(message) => {
            if !ctx.quiet() {
                eprintln!("warning: poll failed: {}", message);
            }
        }
    }
    Ok(())
}

fn event_json(event: &SyncEvent) -> serde_json::Value {
    match event {
        SyncEvent::PhaseChanged { from, to } => json!({
            "event": "phase_changed",
            "from": from,
            "to": to,
        }),
        SyncEvent::CriteriaChanged(open) => json!({
            "event": "criteria_changed",
            "activeCriteria": open,
        }),
        SyncEvent::ResultsFetched(records) => json!({
            "event": "results_fetched",
            "results": ResultsView::new(records, false),
        }),
        SyncEvent::PollFailed(message) => json!({
            "event": "poll_failed",
            "message": message,
        }),
    }
}
