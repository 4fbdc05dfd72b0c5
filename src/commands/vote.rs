//! `panelvote vote` - submit a ballot for the open criteria

use serde_json::json;

use crate::cli::parse::ScoreArg;
use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use panelvote_core::api::SafeCalls;
use panelvote_core::ballot::Ballot;
use panelvote_core::criteria::rubric_for;
use panelvote_core::error::{PanelError, Result};
use panelvote_core::session::Role;
use panelvote_core::sync::ViewPhase;
use panelvote_core::{bail_usage, trace_time};

pub fn execute(ctx: &CommandContext, scores: &[ScoreArg]) -> Result<()> {
    let mut session = ctx.session_with_role(Role::Panelist)?;
    if scores.is_empty() {
        bail_usage!("at least one --score CRITERION=N is required");
    }

    let backend = ctx.backend()?;
    let state = backend.game_state_or_default();
    match ViewPhase::from_state(&state) {
        ViewPhase::Voting => {}
        ViewPhase::AwaitingCriteria => {
            return Err(PanelError::Other(
                "no criteria are open for voting yet".to_string(),
            ))
        }
        ViewPhase::ResultsPublished => {
            return Err(PanelError::Other(
                "voting is closed; results have been published".to_string(),
            ))
        }
    }

    // Resume from the stored vote; the backend upserts the whole mapping
    let previous = backend
        .scores_or_empty()
        .into_iter()
        .find(|record| record.panelist_id == session.username())
        .map(|record| record.scores())
        .unwrap_or_else(|| session.ballot.clone());
    let mut ballot = Ballot::from_scores(&previous);
    for arg in scores {
        ballot.set_score(&state, arg.criterion, arg.score)?;
    }

    if !ballot.submit(backend.as_ref(), &session.user) {
        return Err(PanelError::Other(
            "vote was not accepted by the backend".to_string(),
        ));
    }
    trace_time!(ctx.start, "submit_vote");

    session.ballot = ballot.scores().clone();
    ctx.sessions()?.save(&session)?;

    match ctx.format() {
        OutputFormat::Json => {
            let output = json!({
                "submitted": ballot.is_submitted(),
                "panelistId": session.username(),
                "scores": ballot.scores(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !ctx.quiet() {
                println!("Vote submitted for {}", session.user.name);
                for (criterion, score) in ballot.votable(&state) {
                    let label = rubric_for(score).map(|l| l.label).unwrap_or_default();
                    println!("  {:<20} {} {}", criterion.label(), score, label);
                }
            }
        }
    }
    Ok(())
}
