//! Command-line interface for Questline.

pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::errors::DomainError;

use commands::{
    activity::ActivityArgs, evaluate::EvaluateArgs, init::InitArgs, quest::QuestArgs, xp::XpArgs,
};

#[derive(Parser, Debug)]
#[command(name = "questline", version, about = "Quest and progression engine for financial habits")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .questline/
    #[arg(short, long, global = true, env = "QUESTLINE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Questline configuration and database
    Init(InitArgs),
    /// Quest management commands
    Quest(QuestArgs),
    /// Experience and level commands
    Xp(XpArgs),
    /// Record financial and learning activity
    Activity(ActivityArgs),
    /// Run a quest evaluation pass for a user
    Evaluate(EvaluateArgs),
}

/// Print a command error and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let kind = err
        .downcast_ref::<DomainError>()
        .map_or("error", DomainError::kind);

    if json_mode {
        let body = serde_json::json!({ "error": format!("{err:#}"), "kind": kind });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
    }
    std::process::exit(1);
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
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from(["questline", "--json", "evaluate", "--user", "4"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Evaluate(ref args) if args.user == 4));
    }

    #[test]
    fn test_parse_quest_add() {
        let cli = Cli::try_parse_from([
            "questline", "quest", "add", "--user", "1", "Save $50", "--required", "50", "--xp", "30",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Quest(_)));
    }

    #[test]
    fn test_negative_xp_award_parses() {
        // Validation happens in the ledger, not in argument parsing.
        let cli = Cli::try_parse_from(["questline", "xp", "award", "--user", "1", "--", "-5"]).unwrap();
        assert!(matches!(cli.command, Commands::Xp(_)));
    }
}
