//! Command implementations for all panelvote commands

use crate::cli::{AdminCommands, Commands};
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{admin, criteria, login, results, status, vote, watch};
use panelvote_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Login { username, password } => login::execute(ctx, username, password),
            Commands::Logout => login::execute_logout(ctx),
            Commands::Whoami => login::execute_whoami(ctx),
            Commands::Criteria => criteria::execute(ctx),
            Commands::Status => status::execute(ctx),
            Commands::Vote { scores } => vote::execute(ctx, scores),
            Commands::Results { show_names } => results::execute(ctx, *show_names),
            Commands::Admin(AdminCommands::Toggle { criterion }) => {
                admin::execute_toggle(ctx, *criterion)
            }
            Commands::Admin(AdminCommands::Publish) => admin::execute_publish(ctx),
            Commands::Watch => watch::execute(ctx),
        }
    }
}
