//! SQLite implementation of the QuestRepository.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Quest, QuestType};
use crate::domain::ports::QuestRepository;

const QUEST_COLUMNS: &str =
    "id, user_id, title, description, quest_type, xp_reward, required_amount, completed, progress, deadline";

#[derive(Clone)]
pub struct SqliteQuestRepository {
    pool: SqlitePool,
}

impl SqliteQuestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: i64, user_id: i64) -> DomainResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM quests WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn fetch_where(&self, clause: &str, user_id: i64) -> DomainResult<Vec<Quest>> {
        let query = format!("SELECT {QUEST_COLUMNS} FROM quests WHERE user_id = ?{clause} ORDER BY id");
        let rows: Vec<QuestRow> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[async_trait]
impl QuestRepository for SqliteQuestRepository {
    async fn create(&self, quest: &Quest) -> DomainResult<i64> {
        if let Some(id) = quest.id {
            return Err(DomainError::ValidationFailed(format!("quest already has id {id}")));
        }
        quest.validate()?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"INSERT INTO quests (user_id, title, description, quest_type, xp_reward, required_amount, completed, progress, deadline, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        )
        .bind(quest.user_id)
        .bind(&quest.title)
        .bind(&quest.description)
        .bind(quest.quest_type.as_str())
        .bind(i64::from(quest.xp_reward))
        .bind(quest.required_amount)
        .bind(quest.is_completed())
        .bind(i64::from(quest.progress()))
        .bind(quest.deadline.map(|d| d.to_string()))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64, user_id: i64) -> DomainResult<Option<Quest>> {
        let query = format!("SELECT {QUEST_COLUMNS} FROM quests WHERE id = ? AND user_id = ?");
        let row: Option<QuestRow> = sqlx::query_as(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_active(&self, user_id: i64) -> DomainResult<Vec<Quest>> {
        self.fetch_where(" AND completed = 0", user_id).await
    }

    async fn list_for_user(&self, user_id: i64) -> DomainResult<Vec<Quest>> {
        self.fetch_where("", user_id).await
    }

    async fn save(&self, quest: &Quest) -> DomainResult<()> {
        let id = quest.require_id()?;
        quest.validate()?;

        let result = sqlx::query(
            r#"UPDATE quests SET title = ?, description = ?, quest_type = ?, xp_reward = ?,
               required_amount = ?, completed = ?, progress = ?, deadline = ?, updated_at = ?
               WHERE id = ? AND user_id = ?"#
        )
        .bind(&quest.title)
        .bind(&quest.description)
        .bind(quest.quest_type.as_str())
        .bind(i64::from(quest.xp_reward))
        .bind(quest.required_amount)
        .bind(quest.is_completed())
        .bind(i64::from(quest.progress()))
        .bind(quest.deadline.map(|d| d.to_string()))
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(quest.user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::QuestNotFound(id));
        }

        Ok(())
    }

    async fn update_progress(&self, id: i64, user_id: i64, progress: u8) -> DomainResult<bool> {
        if progress >= 100 {
            return Err(DomainError::ValidationFailed(
                "progress 100 is only reachable through completion".to_string(),
            ));
        }

        let result = sqlx::query(
            "UPDATE quests SET progress = ?, updated_at = ? WHERE id = ? AND user_id = ? AND completed = 0",
        )
        .bind(i64::from(progress))
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }
        if self.exists(id, user_id).await? {
            Ok(false)
        } else {
            Err(DomainError::QuestNotFound(id))
        }
    }

    async fn mark_completed(&self, id: i64, user_id: i64) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE quests SET completed = 1, progress = 100, updated_at = ? WHERE id = ? AND user_id = ? AND completed = 0",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }
        if self.exists(id, user_id).await? {
            Ok(false)
        } else {
            Err(DomainError::QuestNotFound(id))
        }
    }

    async fn reopen(&self, id: i64, user_id: i64, progress: u8) -> DomainResult<()> {
        let progress = progress.min(99);
        let result = sqlx::query(
            "UPDATE quests SET completed = 0, progress = ?, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(i64::from(progress))
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::QuestNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64, user_id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM quests WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::QuestNotFound(id));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct QuestRow {
    id: i64,
    user_id: i64,
    title: String,
    description: String,
    quest_type: String,
    xp_reward: i64,
    required_amount: f64,
    completed: bool,
    progress: i64,
    deadline: Option<String>,
}

impl TryFrom<QuestRow> for Quest {
    type Error = DomainError;

    fn try_from(row: QuestRow) -> Result<Self, Self::Error> {
        let quest_type = QuestType::from_str(&row.quest_type)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid quest type: {}", row.quest_type)))?;
        let xp_reward = u32::try_from(row.xp_reward)
            .map_err(|e| DomainError::SerializationError(format!("Invalid xp reward {}: {e}", row.xp_reward)))?;
        let deadline = row
            .deadline
            .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d"))
            .transpose()
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;

        Ok(Quest::restore(
            row.id,
            row.user_id,
            row.title,
            row.description,
            quest_type,
            xp_reward,
            row.required_amount,
            row.completed,
            row.progress,
            deadline,
        ))
    }
}
