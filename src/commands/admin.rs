//! `panelvote admin` - criterion and publish toggles

use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use panelvote_core::admin::{AdminConsole, ToggleOutcome};
use panelvote_core::criteria::Criterion;
use panelvote_core::error::Result;
use panelvote_core::session::Role;
use panelvote_core::sync::ViewPhase;

pub fn execute_toggle(ctx: &CommandContext, criterion: Criterion) -> Result<()> {
    ctx.session_with_role(Role::Admin)?;
    let backend = ctx.backend()?;
    let mut console = AdminConsole::load(backend.as_ref())?;

    let outcome = console.toggle_criterion(criterion);
    let status = if outcome.enabled { "open" } else { "closed" };
    report(ctx, &console, criterion.id(), status, outcome)
}

pub fn execute_publish(ctx: &CommandContext) -> Result<()> {
    ctx.session_with_role(Role::Admin)?;
    let backend = ctx.backend()?;
    let mut console = AdminConsole::load(backend.as_ref())?;

    let outcome = console.toggle_publish();
    let status = if outcome.enabled {
        "published"
    } else {
        "unpublished"
    };
    report(ctx, &console, "results", status, outcome)
}

fn report(
    ctx: &CommandContext,
    console: &AdminConsole,
    target: &str,
    status: &str,
    outcome: ToggleOutcome,
) -> Result<()> {
    let state = console.state();
    match ctx.format() {
        OutputFormat::Json => {
            let output = json!({
                "target": target,
                "status": status,
                "pushed": outcome.pushed,
                "phase": ViewPhase::from_state(&state),
                "activeCriteria": state.votable(),
                "resultsPublished": state.results_published,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !ctx.quiet() {
                println!("{}: {}", target, status);
            }
            if !outcome.pushed {
                eprintln!("warning: backend did not acknowledge the update");
            }
        }
    }
    Ok(())
}
