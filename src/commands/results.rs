//! `panelvote results` - results table and summary

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use panelvote_core::api::SafeCalls;
use panelvote_core::error::{PanelError, Result};
use panelvote_core::format::ResultsView;
use panelvote_core::session::Role;
use panelvote_core::trace_time;

/// Administrators always see results and may reveal names; panelists only
/// once results are published, and always anonymized.
pub fn execute(ctx: &CommandContext, show_names: bool) -> Result<()> {
    let session = ctx.session()?;
    let backend = ctx.backend()?;

    let records = match session.role() {
        Role::Admin => backend.scores_or_empty(),
        Role::Panelist => {
            if show_names {
                session.require_role(Role::Admin)?;
            }
            if !backend.game_state_or_default().results_published {
                return Err(PanelError::ResultsNotPublished);
            }
            backend.scores_or_empty()
        }
    };
    trace_time!(ctx.start, "fetch_scores", records = records.len());

    let view = ResultsView::new(&records, show_names);
    match ctx.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Human => {
            if records.is_empty() {
                if !ctx.quiet() {
                    println!("No votes yet");
                }
            } else {
                print!("{}", view.render_human());
            }
        }
    }
    Ok(())
}
