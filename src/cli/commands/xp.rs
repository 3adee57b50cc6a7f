//! Experience CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::Path;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{xp_for_next_level, ExperienceRecord};

#[derive(Args, Debug)]
pub struct XpArgs {
    #[command(subcommand)]
    pub command: XpCommands,
}

#[derive(Subcommand, Debug)]
pub enum XpCommands {
    /// Show a user's XP and level
    Show {
        #[arg(short, long)]
        user: i64,
    },
    /// Award XP to a user
    Award {
        #[arg(short, long)]
        user: i64,
        /// XP to add (must be non-negative)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Overwrite a user's XP total
    Set {
        #[arg(short, long)]
        user: i64,
        /// New XP total
        #[arg(allow_negative_numbers = true)]
        xp: i64,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct ExperienceOutput {
    pub user_id: i64,
    pub current_xp: u64,
    pub level: u32,
    pub next_level_at: u64,
    pub xp_into_level: u64,
    pub xp_to_next_level: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leveled_up: Option<bool>,
}

impl ExperienceOutput {
    fn new(record: &ExperienceRecord, leveled_up: Option<bool>) -> Self {
        let (into, remaining) = record.progress_to_next_level();
        Self {
            user_id: record.user_id,
            current_xp: record.current_xp,
            level: record.level,
            next_level_at: xp_for_next_level(record.level),
            xp_into_level: into,
            xp_to_next_level: remaining,
            leveled_up,
        }
    }
}

impl CommandOutput for ExperienceOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("User {}: level {} ({} XP)", self.user_id, self.level, self.current_xp),
            format!(
                "{} XP into this level, {} XP until level {} at {} XP",
                self.xp_into_level,
                self.xp_to_next_level,
                self.level + 1,
                self.next_level_at
            ),
        ];
        if self.leveled_up == Some(true) {
            lines.push(console::style("Level up!").green().bold().to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(args: XpArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let ctx = AppContext::load(config_path).await?;

    let out = match args.command {
        XpCommands::Show { user } => {
            let record = ctx.ledger.get_experience(user).await?;
            ExperienceOutput::new(&record, None)
        }
        XpCommands::Award { user, amount } => {
            let before = ctx.ledger.get_experience(user).await?;
            let level = ctx.ledger.add_xp(user, amount).await?;
            let record = ctx.ledger.get_experience(user).await?;
            ExperienceOutput::new(&record, Some(level > before.level))
        }
        XpCommands::Set { user, xp } => {
            let record = ctx.ledger.set_experience(user, xp).await?;
            ExperienceOutput::new(&record, None)
        }
    };

    output(&out, json_mode);
    Ok(())
}
