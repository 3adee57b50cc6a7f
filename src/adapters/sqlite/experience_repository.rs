//! SQLite implementation of the ExperienceRepository.
//!
//! XP and level are written together inside one transaction; readers never
//! see a new XP total next to a stale level.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{level_for_xp, ExperienceRecord};
use crate::domain::ports::ExperienceRepository;

#[derive(Clone)]
pub struct SqliteExperienceRepository {
    pool: SqlitePool,
}

impl SqliteExperienceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn to_db(xp: u64) -> DomainResult<i64> {
    i64::try_from(xp).map_err(|_| DomainError::ValidationFailed(format!("XP total {xp} is out of range")))
}

fn record_from_row(user_id: i64, current_xp: i64) -> DomainResult<ExperienceRecord> {
    let xp = u64::try_from(current_xp)
        .map_err(|_| DomainError::SerializationError(format!("negative XP stored for user {user_id}")))?;
    Ok(ExperienceRecord::from_xp(user_id, xp))
}

#[async_trait]
impl ExperienceRepository for SqliteExperienceRepository {
    async fn get(&self, user_id: i64) -> DomainResult<Option<ExperienceRecord>> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT current_xp FROM experience WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(xp,)| record_from_row(user_id, xp)).transpose()
    }

    async fn get_or_create(&self, user_id: i64) -> DomainResult<ExperienceRecord> {
        sqlx::query(
            "INSERT INTO experience (user_id, current_xp, level, updated_at) VALUES (?, 0, 0, ?)
             ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get(user_id)
            .await?
            .ok_or(DomainError::ExperienceNotFound(user_id))
    }

    async fn add_xp(&self, user_id: i64, amount: u64) -> DomainResult<ExperienceRecord> {
        let amount = to_db(amount)?;
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        // The upsert takes the write lock before the level is derived.
        let (current_xp,): (i64,) = sqlx::query_as(
            "INSERT INTO experience (user_id, current_xp, level, updated_at) VALUES (?, ?, 0, ?)
             ON CONFLICT(user_id) DO UPDATE SET current_xp = current_xp + excluded.current_xp,
                                                updated_at = excluded.updated_at
             RETURNING current_xp",
        )
        .bind(user_id)
        .bind(amount)
        .bind(&now)
        .fetch_one(&mut *tx)
        .await?;

        let record = record_from_row(user_id, current_xp)?;
        sqlx::query("UPDATE experience SET level = ? WHERE user_id = ?")
            .bind(i64::from(record.level))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(record)
    }

    async fn set_xp(&self, user_id: i64, xp: u64) -> DomainResult<ExperienceRecord> {
        let result = sqlx::query("UPDATE experience SET current_xp = ?, level = ?, updated_at = ? WHERE user_id = ?")
            .bind(to_db(xp)?)
            .bind(i64::from(level_for_xp(xp)))
            .bind(Utc::now().to_rfc3339())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ExperienceNotFound(user_id));
        }

        Ok(ExperienceRecord::from_xp(user_id, xp))
    }
}
