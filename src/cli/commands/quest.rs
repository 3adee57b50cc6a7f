//! Quest CLI commands.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::Path;

use crate::cli::context::AppContext;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::errors::DomainError;
use crate::domain::models::{Quest, QuestType};
use crate::domain::ports::QuestRepository;
use crate::services::QuestClassifier;

#[derive(Args, Debug)]
pub struct QuestArgs {
    #[command(subcommand)]
    pub command: QuestCommands,
}

#[derive(Subcommand, Debug)]
pub enum QuestCommands {
    /// Create a new quest
    Add {
        /// Owning user
        #[arg(short, long)]
        user: i64,
        /// Quest title
        title: String,
        /// Quest description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Cadence (daily, weekly, monthly)
        #[arg(short = 't', long = "type", default_value = "daily")]
        quest_type: String,
        /// XP awarded on completion
        #[arg(long, default_value_t = 0)]
        xp: u32,
        /// Threshold: a count, a currency amount or a level
        #[arg(short, long, default_value_t = 0.0)]
        required: f64,
        /// Deadline (YYYY-MM-DD); defaults from the cadence
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },
    /// List a user's quests
    List {
        #[arg(short, long)]
        user: i64,
        /// Include completed quests
        #[arg(short, long)]
        all: bool,
    },
    /// Show quest details
    Show {
        /// Quest ID
        id: i64,
        #[arg(short, long)]
        user: i64,
    },
    /// Delete a quest
    Delete {
        /// Quest ID
        id: i64,
        #[arg(short, long)]
        user: i64,
    },
    /// Create the sample quest catalogue for a user with no quests
    Seed {
        #[arg(short, long)]
        user: i64,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct QuestOutput {
    pub id: Option<i64>,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub kind: String,
    /// Whether evaluation passes can complete this quest
    pub automated: bool,
    pub quest_type: String,
    pub xp_reward: u32,
    pub required_amount: f64,
    pub progress: u8,
    pub completed: bool,
    pub deadline: Option<String>,
    pub overdue: bool,
}

impl QuestOutput {
    fn from_quest(quest: &Quest, today: NaiveDate) -> Self {
        let kind = QuestClassifier::new().classify(&quest.title, &quest.description);
        Self {
            id: quest.id,
            user_id: quest.user_id,
            title: quest.title.clone(),
            description: quest.description.clone(),
            kind: kind.to_string(),
            automated: kind.is_automated(),
            quest_type: quest.quest_type.as_str().to_string(),
            xp_reward: quest.xp_reward,
            required_amount: quest.required_amount,
            progress: quest.progress(),
            completed: quest.is_completed(),
            deadline: quest.deadline.map(|d| d.to_string()),
            overdue: quest.is_overdue(today),
        }
    }

    fn id_str(&self) -> String {
        self.id.map_or_else(|| "-".to_string(), |id| id.to_string())
    }

    fn kind_label(&self) -> String {
        if self.automated {
            self.kind.clone()
        } else {
            format!("{} (manual)", self.kind)
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct QuestListOutput {
    pub quests: Vec<QuestOutput>,
    pub total: usize,
}

impl CommandOutput for QuestListOutput {
    fn to_human(&self) -> String {
        if self.quests.is_empty() {
            return "No quests found.".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["ID", "TITLE", "KIND", "TYPE", "XP", "PROGRESS", "DEADLINE"]);

        for quest in &self.quests {
            let progress = if quest.completed {
                "done".to_string()
            } else {
                format!("{}%", quest.progress)
            };
            let deadline = match (&quest.deadline, quest.overdue) {
                (Some(d), true) => format!("{d} (overdue)"),
                (Some(d), false) => d.clone(),
                (None, _) => "-".to_string(),
            };
            table.add_row(vec![
                quest.id_str(),
                truncate(&quest.title, 28),
                quest.kind_label(),
                quest.quest_type.clone(),
                quest.xp_reward.to_string(),
                progress,
                deadline,
            ]);
        }

        format!("Found {} quest(s):\n{table}", self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct QuestDetailOutput {
    pub quest: QuestOutput,
}

impl CommandOutput for QuestDetailOutput {
    fn to_human(&self) -> String {
        let q = &self.quest;
        let mut lines = vec![
            format!("Quest: {}", q.title),
            format!("ID: {}", q.id_str()),
            format!("User: {}", q.user_id),
            format!("Kind: {}", q.kind_label()),
            format!("Type: {}", q.quest_type),
            format!("XP reward: {}", q.xp_reward),
            format!("Required: {}", q.required_amount),
            format!("Progress: {}%{}", q.progress, if q.completed { " (completed)" } else { "" }),
        ];
        if !q.description.is_empty() {
            lines.push(format!("Description: {}", q.description));
        }
        if let Some(deadline) = &q.deadline {
            lines.push(format!("Deadline: {deadline}{}", if q.overdue { " (overdue)" } else { "" }));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct QuestActionOutput {
    pub success: bool,
    pub message: String,
    pub quest_ids: Vec<i64>,
}

impl CommandOutput for QuestActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

pub async fn execute(args: QuestArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let ctx = AppContext::load(config_path).await?;
    let today = Local::now().date_naive();

    match args.command {
        QuestCommands::Add { user, title, description, quest_type, xp, required, deadline } => {
            let quest_type = QuestType::from_str(&quest_type)
                .ok_or_else(|| anyhow!("Invalid quest type: {quest_type}"))?;
            let quest = Quest::new(user, title, description)
                .with_type(quest_type)
                .with_xp_reward(xp)
                .with_required_amount(required)
                .with_deadline(deadline.unwrap_or_else(|| quest_type.default_deadline(today)));

            let id = ctx.quests.create(&quest).await.context("Failed to create quest")?;
            output(
                &QuestActionOutput {
                    success: true,
                    message: format!("Quest created with ID {id}"),
                    quest_ids: vec![id],
                },
                json_mode,
            );
        }
        QuestCommands::List { user, all } => {
            let quests = if all {
                ctx.quests.list_for_user(user).await?
            } else {
                ctx.quests.list_active(user).await?
            };
            let out = QuestListOutput {
                total: quests.len(),
                quests: quests.iter().map(|q| QuestOutput::from_quest(q, today)).collect(),
            };
            output(&out, json_mode);
        }
        QuestCommands::Show { id, user } => {
            let quest = ctx
                .quests
                .get(id, user)
                .await?
                .ok_or(DomainError::QuestNotFound(id))?;
            output(
                &QuestDetailOutput {
                    quest: QuestOutput::from_quest(&quest, today),
                },
                json_mode,
            );
        }
        QuestCommands::Delete { id, user } => {
            ctx.quests.delete(id, user).await?;
            output(
                &QuestActionOutput {
                    success: true,
                    message: format!("Quest {id} deleted"),
                    quest_ids: vec![id],
                },
                json_mode,
            );
        }
        QuestCommands::Seed { user } => {
            let ids = ctx.seeder().seed(user, today).await?;
            let message = if ids.is_empty() {
                format!("User {user} already has quests; nothing seeded")
            } else {
                format!("Seeded {} sample quest(s) for user {user}", ids.len())
            };
            output(
                &QuestActionOutput {
                    success: true,
                    message,
                    quest_ids: ids,
                },
                json_mode,
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
    }

    #[test]
    fn test_manual_quests_are_labelled() {
        let manual = QuestOutput::from_quest(&Quest::new(1, "Complete all goals", ""), today());
        assert!(!manual.automated);
        assert_eq!(manual.kind_label(), "goal_completion (manual)");

        let automated = QuestOutput::from_quest(&Quest::new(1, "Reach level 3", ""), today());
        assert!(automated.automated);
        assert_eq!(automated.kind_label(), "level_target");
    }

    #[test]
    fn test_list_shows_kind_labels() {
        let out = QuestListOutput {
            quests: vec![QuestOutput::from_quest(&Quest::new(1, "Read a finance book", ""), today())],
            total: 1,
        };
        assert!(out.to_human().contains("unclassified (manual)"));
    }
}
