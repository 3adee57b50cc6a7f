//! Per-pass metrics snapshot.
//!
//! Metrics are fetched lazily on first use and memoised for the rest of the
//! pass, all relative to a single `as_of` date. A failed query is not cached:
//! it fails the quest that asked for it and the next quest retries.

use chrono::NaiveDate;
use tokio::sync::OnceCell;

use crate::domain::errors::DomainResult;
use crate::domain::ports::{ExperienceRepository, MetricsProvider};

pub struct MetricsSnapshot<'a, M: MetricsProvider, E: ExperienceRepository> {
    metrics: &'a M,
    experience: &'a E,
    user_id: i64,
    as_of: NaiveDate,
    transaction_count: OnceCell<u64>,
    transactions_today: OnceCell<u64>,
    monthly_income: OnceCell<f64>,
    monthly_expenses: OnceCell<f64>,
    quiz_count: OnceCell<u64>,
    level: OnceCell<u32>,
}

impl<'a, M: MetricsProvider, E: ExperienceRepository> MetricsSnapshot<'a, M, E> {
    pub fn new(metrics: &'a M, experience: &'a E, user_id: i64, as_of: NaiveDate) -> Self {
        Self {
            metrics,
            experience,
            user_id,
            as_of,
            transaction_count: OnceCell::new(),
            transactions_today: OnceCell::new(),
            monthly_income: OnceCell::new(),
            monthly_expenses: OnceCell::new(),
            quiz_count: OnceCell::new(),
            level: OnceCell::new(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub async fn transaction_count(&self) -> DomainResult<u64> {
        self.transaction_count
            .get_or_try_init(|| self.metrics.transaction_count(self.user_id))
            .await
            .copied()
    }

    pub async fn transactions_today(&self) -> DomainResult<u64> {
        self.transactions_today
            .get_or_try_init(|| self.metrics.transaction_count_on_day(self.user_id, self.as_of))
            .await
            .copied()
    }

    pub async fn monthly_income(&self) -> DomainResult<f64> {
        self.monthly_income
            .get_or_try_init(|| self.metrics.monthly_income(self.user_id, self.as_of))
            .await
            .copied()
    }

    pub async fn monthly_expenses(&self) -> DomainResult<f64> {
        self.monthly_expenses
            .get_or_try_init(|| self.metrics.monthly_expenses(self.user_id, self.as_of))
            .await
            .copied()
    }

    pub async fn quiz_completion_count(&self) -> DomainResult<u64> {
        self.quiz_count
            .get_or_try_init(|| self.metrics.quiz_completion_count(self.user_id))
            .await
            .copied()
    }

    /// The user's level, provisioning a zeroed experience record if needed.
    pub async fn current_level(&self) -> DomainResult<u32> {
        self.level
            .get_or_try_init(|| async {
                let record = self.experience.get_or_create(self.user_id).await?;
                Ok(record.level)
            })
            .await
            .copied()
    }
}
