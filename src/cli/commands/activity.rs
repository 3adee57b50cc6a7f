//! Activity recording commands.
//!
//! These write the transactions and quiz completions that the metrics
//! provider aggregates during evaluation passes.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use std::path::Path;

use tracing::error;

use crate::adapters::sqlite::{Direction, SqliteActivityRepository};
use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::DomainResult;
use crate::domain::ports::ExperienceRepository;
use crate::services::ExperienceLedger;

#[derive(Args, Debug)]
pub struct ActivityArgs {
    #[command(subcommand)]
    pub command: ActivityCommands,
}

#[derive(Subcommand, Debug)]
pub enum ActivityCommands {
    /// Log a transaction
    Transaction {
        #[arg(short, long)]
        user: i64,
        /// Amount (non-negative)
        amount: f64,
        /// income or expense
        #[arg(short, long, default_value = "expense")]
        direction: String,
        /// Date of the transaction (YYYY-MM-DD), defaults to today
        #[arg(long)]
        on: Option<NaiveDate>,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Record a completed quiz and credit quiz XP
    Quiz {
        #[arg(short, long)]
        user: i64,
        /// Quiz name
        name: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct ActivityOutput {
    pub success: bool,
    pub message: String,
    pub record_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl CommandOutput for ActivityOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

/// Record a quiz completion and credit the quiz reward as one unit.
///
/// The completion row is removed again if the XP award fails, so a quiz
/// never counts toward quests without its XP having been credited.
pub async fn record_quiz<E: ExperienceRepository>(
    activity: &SqliteActivityRepository,
    ledger: &ExperienceLedger<E>,
    user_id: i64,
    quiz_name: &str,
) -> DomainResult<(i64, u32)> {
    let id = activity.record_quiz_completion(user_id, quiz_name).await?;

    match ledger.award_quiz_completion(user_id).await {
        Ok(level) => Ok((id, level)),
        Err(award_err) => {
            if let Err(rollback_err) = activity.delete_quiz_completion(id).await {
                error!(
                    user_id,
                    quiz_id = id,
                    error = %rollback_err,
                    "failed to remove quiz completion after xp award failure"
                );
            }
            Err(award_err)
        }
    }
}

pub async fn execute(args: ActivityArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let ctx = AppContext::load(config_path).await?;

    let out = match args.command {
        ActivityCommands::Transaction { user, amount, direction, on, note } => {
            let direction = Direction::from_str(&direction)
                .ok_or_else(|| anyhow!("Invalid direction: {direction}. Must be income or expense"))?;
            let day = on.unwrap_or_else(|| Local::now().date_naive());
            let id = ctx
                .activity
                .record_transaction(user, amount, direction, day, note.as_deref())
                .await?;
            ActivityOutput {
                success: true,
                message: format!("Recorded {} of {amount:.2} on {day}", direction.as_str()),
                record_id: id,
                level: None,
            }
        }
        ActivityCommands::Quiz { user, name } => {
            let (id, level) = record_quiz(ctx.activity.as_ref(), ctx.ledger.as_ref(), user, &name).await?;
            ActivityOutput {
                success: true,
                message: format!(
                    "Recorded quiz '{name}' (+{} XP, level {level})",
                    ctx.config.quests.quiz_xp_reward
                ),
                record_id: id,
                level: Some(level),
            }
        }
    };

    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteExperienceRepository};
    use crate::domain::errors::DomainError;
    use crate::domain::ports::{MetricsProvider, MockExperienceRepository};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_record_quiz_credits_reward() {
        let pool = create_migrated_test_pool().await.unwrap();
        let activity = SqliteActivityRepository::new(pool.clone());
        let ledger = ExperienceLedger::new(Arc::new(SqliteExperienceRepository::new(pool)))
            .with_quiz_xp_reward(100);

        let (_, level) = record_quiz(&activity, &ledger, 3, "Budgeting 101").await.unwrap();
        assert_eq!(level, 1);
        assert_eq!(activity.quiz_completion_count(3).await.unwrap(), 1);
        assert_eq!(ledger.get_experience(3).await.unwrap().current_xp, 100);
    }

    #[tokio::test]
    async fn test_failed_award_removes_quiz_completion() {
        let pool = create_migrated_test_pool().await.unwrap();
        let activity = SqliteActivityRepository::new(pool);

        let mut experience = MockExperienceRepository::new();
        experience
            .expect_add_xp()
            .times(1)
            .returning(|_, _| Err(DomainError::PersistenceFailure("database is locked".into())));
        let ledger = ExperienceLedger::new(Arc::new(experience));

        let err = record_quiz(&activity, &ledger, 3, "Credit basics").await.unwrap_err();
        assert!(matches!(err, DomainError::PersistenceFailure(_)));
        assert_eq!(activity.quiz_completion_count(3).await.unwrap(), 0);
    }
}
