//! Command trait and context for dispatching commands

use std::time::Instant;

use crate::cli::{Cli, OutputFormat};
use panelvote_core::api::{self, Backend};
use panelvote_core::config::ClientConfig;
use panelvote_core::error::Result;
use panelvote_core::session::{Role, Session, SessionStore};

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, start: Instant) -> Self {
        Self { cli, start }
    }

    pub fn format(&self) -> OutputFormat {
        self.cli.format
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Config file, then environment, then `--endpoint`
    pub fn config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig::load()?.with_endpoint(self.cli.endpoint.as_deref()))
    }

    pub fn backend(&self) -> Result<Box<dyn Backend>> {
        Ok(api::connect(&self.config()?))
    }

    pub fn sessions(&self) -> Result<SessionStore> {
        SessionStore::default_location()
    }

    /// The active session, or `NotLoggedIn`
    pub fn session(&self) -> Result<Session> {
        self.sessions()?.require()
    }

    /// The active session, which must hold `role`
    pub fn session_with_role(&self, role: Role) -> Result<Session> {
        let session = self.session()?;
        session.require_role(role)?;
        Ok(session)
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("panelvote {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("A scoring client for evaluation panels.");
        println!();
        println!("Run `panelvote --help` for usage information.");
        Ok(())
    }
}
