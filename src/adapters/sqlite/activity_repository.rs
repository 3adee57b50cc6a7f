//! SQLite-backed activity log and metrics provider.
//!
//! Transactions and quiz completions are recorded here and aggregated on
//! demand for quest evaluation. Query failures surface as
//! `MetricsUnavailable` so the engine can isolate them per quest.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::MetricsProvider;

/// Whether a transaction adds to or draws from the user's funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

fn unavailable(err: sqlx::Error) -> DomainError {
    DomainError::MetricsUnavailable(err.to_string())
}

fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// First day of the month containing `date`, and the first day of the next.
fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).unwrap_or(date);
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    }
    .unwrap_or(start);
    (start, end)
}

#[derive(Clone)]
pub struct SqliteActivityRepository {
    pool: SqlitePool,
}

impl SqliteActivityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a transaction and return its id.
    pub async fn record_transaction(
        &self,
        user_id: i64,
        amount: f64,
        direction: Direction,
        occurred_on: NaiveDate,
        note: Option<&str>,
    ) -> DomainResult<i64> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::ValidationFailed(format!(
                "transaction amount must be a non-negative number, got {amount}"
            )));
        }

        let result = sqlx::query(
            "INSERT INTO transactions (user_id, amount, direction, occurred_on, note) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(amount)
        .bind(direction.as_str())
        .bind(occurred_on.to_string())
        .bind(note)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Record a completed quiz and return its id.
    pub async fn record_quiz_completion(&self, user_id: i64, quiz_name: &str) -> DomainResult<i64> {
        let result = sqlx::query("INSERT INTO quiz_completions (user_id, quiz_name, completed_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(quiz_name)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Remove a recorded quiz completion.
    pub async fn delete_quiz_completion(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM quiz_completions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ValidationFailed(format!("no quiz completion with id {id}")));
        }
        Ok(())
    }

    async fn monthly_total(&self, user_id: i64, as_of: NaiveDate, direction: Direction) -> DomainResult<f64> {
        let (start, end) = month_bounds(as_of);
        let (total,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0.0) FROM transactions
             WHERE user_id = ? AND direction = ? AND occurred_on >= ? AND occurred_on < ?",
        )
        .bind(user_id)
        .bind(direction.as_str())
        .bind(start.to_string())
        .bind(end.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(total)
    }
}

#[async_trait]
impl MetricsProvider for SqliteActivityRepository {
    async fn transaction_count(&self, user_id: i64) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(to_count(count))
    }

    async fn transaction_count_on_day(&self, user_id: i64, day: NaiveDate) -> DomainResult<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM transactions WHERE user_id = ? AND occurred_on = ?")
                .bind(user_id)
                .bind(day.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(unavailable)?;
        Ok(to_count(count))
    }

    async fn monthly_income(&self, user_id: i64, as_of: NaiveDate) -> DomainResult<f64> {
        self.monthly_total(user_id, as_of, Direction::Income).await
    }

    async fn monthly_expenses(&self, user_id: i64, as_of: NaiveDate) -> DomainResult<f64> {
        self.monthly_total(user_id, as_of, Direction::Expense).await
    }

    async fn quiz_completion_count(&self, user_id: i64) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quiz_completions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(to_count(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(date(2024, 2, 17)), (date(2024, 2, 1), date(2024, 3, 1)));
        assert_eq!(month_bounds(date(2023, 12, 31)), (date(2023, 12, 1), date(2024, 1, 1)));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(Direction::from_str("Income"), Some(Direction::Income));
        assert_eq!(Direction::from_str("refund"), None);
    }
}
