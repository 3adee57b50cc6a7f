//! Quest repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Quest;

/// Repository interface for Quest persistence.
///
/// Every lookup is scoped to the owning user; a quest id that belongs to
/// another user behaves as if it does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestRepository: Send + Sync {
    /// Persist a new quest and return its assigned id.
    async fn create(&self, quest: &Quest) -> DomainResult<i64>;

    /// Get a quest by id for its owner.
    async fn get(&self, id: i64, user_id: i64) -> DomainResult<Option<Quest>>;

    /// List a user's non-completed quests, oldest first.
    async fn list_active(&self, user_id: i64) -> DomainResult<Vec<Quest>>;

    /// List every quest a user owns, oldest first.
    async fn list_for_user(&self, user_id: i64) -> DomainResult<Vec<Quest>>;

    /// Overwrite an existing quest.
    async fn save(&self, quest: &Quest) -> DomainResult<()>;

    /// Record progress on a quest that is still active.
    ///
    /// Returns `false` without writing when the quest has been completed in
    /// the meantime.
    async fn update_progress(&self, id: i64, user_id: i64, progress: u8) -> DomainResult<bool>;

    /// Atomically flip a quest from active to completed.
    ///
    /// Returns `false` when the quest was already completed, so exactly one
    /// of several concurrent callers observes `true`.
    async fn mark_completed(&self, id: i64, user_id: i64) -> DomainResult<bool>;

    /// Undo a completion, restoring the given pre-completion progress.
    async fn reopen(&self, id: i64, user_id: i64, progress: u8) -> DomainResult<()>;

    /// Delete a quest.
    async fn delete(&self, id: i64, user_id: i64) -> DomainResult<()>;
}
