//! Experience repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::ExperienceRecord;

/// Persistence for per-user XP and level.
///
/// Implementations must apply XP and the recomputed level as one atomic
/// update.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    /// Get a user's record, if one exists.
    async fn get(&self, user_id: i64) -> DomainResult<Option<ExperienceRecord>>;

    /// Get a user's record, provisioning a zeroed one when absent.
    async fn get_or_create(&self, user_id: i64) -> DomainResult<ExperienceRecord>;

    /// Add XP to a user's total (creating the record if needed) and return
    /// the updated record with its level recomputed.
    async fn add_xp(&self, user_id: i64, amount: u64) -> DomainResult<ExperienceRecord>;

    /// Overwrite an existing user's XP total, recomputing the level.
    async fn set_xp(&self, user_id: i64, xp: u64) -> DomainResult<ExperienceRecord>;
}
