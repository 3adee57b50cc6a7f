//! Metrics provider port.
//!
//! Read-only aggregate queries over a user's financial and learning
//! activity. Monthly figures cover the calendar month containing `as_of`.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::errors::DomainResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Number of transactions the user has ever logged.
    async fn transaction_count(&self, user_id: i64) -> DomainResult<u64>;

    /// Number of transactions the user logged on `day`.
    async fn transaction_count_on_day(&self, user_id: i64, day: NaiveDate) -> DomainResult<u64>;

    /// Total income for the month containing `as_of`.
    async fn monthly_income(&self, user_id: i64, as_of: NaiveDate) -> DomainResult<f64>;

    /// Total expenses for the month containing `as_of`.
    async fn monthly_expenses(&self, user_id: i64, as_of: NaiveDate) -> DomainResult<f64>;

    /// Number of quizzes the user has completed.
    async fn quiz_completion_count(&self, user_id: i64) -> DomainResult<u64>;
}
