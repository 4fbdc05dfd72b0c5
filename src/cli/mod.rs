//! CLI argument parsing for panelvote
//!
//! Global flags: --endpoint, --format, --quiet, --verbose, --log-level, --log-json

pub mod parse;

use clap::{Parser, Subcommand};

use panelvote_core::criteria::Criterion;
pub use panelvote_core::format::OutputFormat;
use parse::{parse_criterion, parse_output_format, parse_score_arg, ScoreArg};

/// Panelvote - panel scoring and voting client
#[derive(Parser, Debug)]
#[command(name = "panelvote")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Backend endpoint URL (overrides config file and PANELVOTE_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(long, global = true, value_parser = parse_output_format, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter (level or tracing directive)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify credentials and start a session
    Login {
        /// Username
        username: String,

        /// Password
        #[arg(long, env = "PANELVOTE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List criteria, weights and the scoring rubric
    Criteria,

    /// Show the current game state and phase
    Status,

    /// Submit scores for the open criteria (panelists only)
    Vote {
        /// Score as CRITERION=N (repeatable)
        #[arg(long = "score", short, value_parser = parse_score_arg, action = clap::ArgAction::Append)]
        scores: Vec<ScoreArg>,
    },

    /// Show the results table
    Results {
        /// Reveal panelist names (administrators only)
        #[arg(long)]
        show_names: bool,
    },

    /// Administrator controls
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Follow the game state until interrupted
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Open or close a criterion for voting
    Toggle {
        /// Criterion id (ozgun_deger, yontem, proje_yonetimi, yaygin_etki)
        #[arg(value_parser = parse_criterion)]
        criterion: Criterion,
    },

    /// Publish or unpublish results
    Publish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_vote_scores() {
        let cli = Cli::try_parse_from([
            "panelvote",
            "vote",
            "--score",
            "yontem=5",
            "-s",
            "ozgun_deger=2",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Vote { scores }) => {
                assert_eq!(scores.len(), 2);
                assert_eq!(scores[0].criterion, Criterion::Yontem);
                assert_eq!(scores[0].score, 5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_admin_toggle() {
        let cli =
            Cli::try_parse_from(["panelvote", "--format", "json", "admin", "toggle", "yontem"])
                .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Some(Commands::Admin(AdminCommands::Toggle {
                criterion: Criterion::Yontem
            }))
        ));
    }

    #[test]
    fn test_unknown_criterion_rejected() {
        assert!(Cli::try_parse_from(["panelvote", "admin", "toggle", "speed"]).is_err());
    }
}
