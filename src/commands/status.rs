//! `panelvote status` - current game state

use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use panelvote_core::api::SafeCalls;
use panelvote_core::error::Result;
use panelvote_core::format::render_state;
use panelvote_core::sync::ViewPhase;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let backend = ctx.backend()?;
    let state = backend.game_state_or_default();
    let phase = ViewPhase::from_state(&state);

    match ctx.format() {
        OutputFormat::Json => {
            let output = json!({
                "phase": phase,
                "activeCriteria": state.votable(),
                "resultsPublished": state.results_published,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => print!("{}", render_state(&state)),
    }
    Ok(())
}
