//! Experience ledger service.
//!
//! Owns XP awards and the level derived from them. Safe to use outside the
//! quest engine, for example to credit XP directly when a quiz is finished.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{level_for_xp, xp_for_next_level, ExperienceRecord};
use crate::domain::ports::ExperienceRepository;

pub struct ExperienceLedger<E: ExperienceRepository> {
    repo: Arc<E>,
    quiz_xp_reward: u32,
}

impl<E: ExperienceRepository> ExperienceLedger<E> {
    pub fn new(repo: Arc<E>) -> Self {
        Self {
            repo,
            quiz_xp_reward: 25,
        }
    }

    /// XP credited by [`Self::award_quiz_completion`].
    pub fn with_quiz_xp_reward(mut self, quiz_xp_reward: u32) -> Self {
        self.quiz_xp_reward = quiz_xp_reward;
        self
    }

    pub fn repository(&self) -> &E {
        &self.repo
    }

    /// Add XP to a user and return their new level.
    ///
    /// Negative amounts are rejected before anything is written.
    #[instrument(skip(self))]
    pub async fn add_xp(&self, user_id: i64, amount: i64) -> DomainResult<u32> {
        let amount = u64::try_from(amount).map_err(|_| DomainError::InvalidAmount(amount))?;
        let record = self.repo.add_xp(user_id, amount).await?;
        let previous_level = level_for_xp(record.current_xp.saturating_sub(amount));

        if previous_level < record.level {
            info!(user_id, level = record.level, xp = record.current_xp, "level up");
        } else {
            debug!(user_id, amount, xp = record.current_xp, "xp added");
        }

        Ok(record.level)
    }

    /// Current XP and level, provisioning a zeroed record for new users.
    pub async fn get_experience(&self, user_id: i64) -> DomainResult<ExperienceRecord> {
        self.repo.get_or_create(user_id).await
    }

    /// Overwrite a user's XP total (admin edit). The user must already have
    /// a record.
    #[instrument(skip(self))]
    pub async fn set_experience(&self, user_id: i64, xp: i64) -> DomainResult<ExperienceRecord> {
        let xp = u64::try_from(xp).map_err(|_| DomainError::InvalidAmount(xp))?;
        let record = self.repo.set_xp(user_id, xp).await?;
        info!(user_id, xp = record.current_xp, level = record.level, "experience overwritten");
        Ok(record)
    }

    /// Credit the configured quiz reward.
    pub async fn award_quiz_completion(&self, user_id: i64) -> DomainResult<u32> {
        self.add_xp(user_id, i64::from(self.quiz_xp_reward)).await
    }

    /// Total XP at which `level + 1` is reached.
    pub fn xp_for_next_level(level: u32) -> u64 {
        xp_for_next_level(level)
    }
}
