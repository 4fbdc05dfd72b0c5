//! `panelvote login`, `logout` and `whoami`

use serde_json::json;
use tracing::info;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use panelvote_core::api::ApiError;
use panelvote_core::error::{PanelError, Result};
use panelvote_core::session::Session;

/// Verify credentials against the backend and persist the session
pub fn execute(ctx: &CommandContext, username: &str, password: &str) -> Result<()> {
    let username = username.trim();
    if username.is_empty() {
        return Err(PanelError::UsageError("username must not be empty".to_string()));
    }

    let backend = ctx.backend()?;
    let user = backend
        .verify_login(username, password)
        .map_err(|e| match e {
            ApiError::Rejected(message) => PanelError::LoginRejected(message),
            ApiError::NotConfigured => {
                PanelError::LoginRejected(ApiError::NotConfigured.to_string())
            }
            other => PanelError::Api(other),
        })?;

    let session = ctx.sessions()?.login(user)?;
    info!(user = %session.username(), role = %session.role(), "logged in");

    match ctx.format() {
        OutputFormat::Json => print_session_json(&session)?,
        OutputFormat::Human => {
            if !ctx.quiet() {
                println!(
                    "Logged in as {} ({})",
                    session.user.name,
                    session.role()
                );
            }
        }
    }
    Ok(())
}

pub fn execute_logout(ctx: &CommandContext) -> Result<()> {
    let ended = ctx.sessions()?.logout()?;

    match ctx.format() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "loggedOut": ended }))?);
        }
        OutputFormat::Human => {
            if !ctx.quiet() {
                if ended {
                    println!("Logged out");
                } else {
                    println!("No active session");
                }
            }
        }
    }
    Ok(())
}

pub fn execute_whoami(ctx: &CommandContext) -> Result<()> {
    let session = ctx.session()?;

    match ctx.format() {
        OutputFormat::Json => print_session_json(&session)?,
        OutputFormat::Human => {
            println!("{} ({})", session.user.name, session.username());
            println!("role: {}", session.role());
            println!(
                "since: {}",
                session.logged_in_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
    }
    Ok(())
}

fn print_session_json(session: &Session) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(session)?);
    Ok(())
}
