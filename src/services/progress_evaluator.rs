//! Progress scoring for classified quests.
//!
//! Each [`QuestKind`] maps to one metric and a threshold taken from the
//! quest's `required_amount`. Scores are percentages clamped to `[0, 100]`;
//! a non-positive `required_amount` falls back to a per-kind floor so the
//! ratio is always defined.

use crate::domain::errors::DomainResult;
use crate::domain::models::{Quest, QuestKind};
use crate::domain::ports::{ExperienceRepository, MetricsProvider};
use crate::services::metrics_snapshot::MetricsSnapshot;
use crate::services::quest_classifier::QuestClassifier;

/// Progress reported for kinds with no metric wired in.
pub const UNMEASURED_PROGRESS: u8 = 50;
/// Budget score when there is no income but expenses stay below it.
pub const BUDGET_NO_INCOME_UNDER: u8 = 80;
/// Budget score when there is no income and expenses meet or exceed it.
pub const BUDGET_NO_INCOME_OVER: u8 = 20;

const SAVINGS_FLOOR: f64 = 100.0;
const LEVEL_FLOOR: f64 = 5.0;
const COUNT_FLOOR: f64 = 1.0;

/// Outcome of evaluating one quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Estimated completion percentage in `[0, 100]`
    pub progress: u8,
    /// Whether the completion condition holds
    pub should_complete: bool,
}

impl Evaluation {
    pub const fn new(progress: u8, should_complete: bool) -> Self {
        Self {
            progress,
            should_complete,
        }
    }

    const fn completed() -> Self {
        Self::new(100, true)
    }
}

/// Convert a ratio to a percentage clamped to `[0, 100]`.
///
/// Truncates toward zero, so 2 of 3 scores 66.
pub fn percent(numerator: f64, denominator: f64) -> u8 {
    let pct = 100.0 * numerator / denominator;
    if pct.is_nan() {
        return 0;
    }
    pct.clamp(0.0, 100.0) as u8
}

fn floor_or(required: f64, floor: f64) -> f64 {
    if required <= 0.0 {
        floor
    } else {
        required.max(floor)
    }
}

pub fn transaction_presence(count: u64) -> Evaluation {
    let progress = if count > 0 { 100 } else { 0 };
    Evaluation::new(progress, progress == 100)
}

pub fn transaction_volume(count: u64, required: f64) -> Evaluation {
    let count = count as f64;
    Evaluation::new(
        percent(count, floor_or(required, COUNT_FLOOR)),
        count >= required,
    )
}

pub fn budget_adherence(income: f64, expenses: f64) -> Evaluation {
    let progress = if income > 0.0 {
        percent(income - expenses, income)
    } else if expenses < income {
        BUDGET_NO_INCOME_UNDER
    } else {
        BUDGET_NO_INCOME_OVER
    };
    Evaluation::new(progress, expenses < income)
}

pub fn savings_threshold(income: f64, expenses: f64, required: f64) -> Evaluation {
    let savings = income - expenses;
    Evaluation::new(
        percent(savings, floor_or(required, SAVINGS_FLOOR)),
        savings >= required,
    )
}

pub fn quiz_completion(quiz_count: u64, required: f64) -> Evaluation {
    let count = quiz_count as f64;
    let should_complete = if required <= 0.0 {
        quiz_count > 0
    } else {
        count >= required
    };
    Evaluation::new(percent(count, floor_or(required, COUNT_FLOOR)), should_complete)
}

pub fn level_target(level: u32, required: f64) -> Evaluation {
    let level = f64::from(level);
    Evaluation::new(
        percent(level, floor_or(required, LEVEL_FLOOR)),
        level >= required,
    )
}

/// Scores quests against a [`MetricsSnapshot`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressEvaluator;

impl ProgressEvaluator {
    pub const fn new() -> Self {
        Self
    }

    /// Evaluate a quest of the given kind.
    ///
    /// Completed quests short-circuit without touching the snapshot. Only the
    /// metric the kind needs is queried, so an unavailable metric fails just
    /// the quests that depend on it.
    pub async fn evaluate<M, E>(
        &self,
        quest: &Quest,
        kind: QuestKind,
        snapshot: &MetricsSnapshot<'_, M, E>,
    ) -> DomainResult<Evaluation>
    where
        M: MetricsProvider,
        E: ExperienceRepository,
    {
        if quest.is_completed() {
            return Ok(Evaluation::completed());
        }

        let required = quest.required_amount;
        let evaluation = match kind {
            QuestKind::TransactionPresence => {
                let count = if QuestClassifier::is_daily_log(&quest.title) {
                    snapshot.transactions_today().await?
                } else {
                    snapshot.transaction_count().await?
                };
                transaction_presence(count)
            }
            QuestKind::TransactionVolume => {
                transaction_volume(snapshot.transaction_count().await?, required)
            }
            QuestKind::BudgetAdherence => budget_adherence(
                snapshot.monthly_income().await?,
                snapshot.monthly_expenses().await?,
            ),
            QuestKind::SavingsThreshold => savings_threshold(
                snapshot.monthly_income().await?,
                snapshot.monthly_expenses().await?,
                required,
            ),
            QuestKind::QuizCompletion => {
                quiz_completion(snapshot.quiz_completion_count().await?, required)
            }
            QuestKind::LevelTarget => level_target(snapshot.current_level().await?, required),
            QuestKind::GoalCompletion | QuestKind::Unclassified => {
                Evaluation::new(UNMEASURED_PROGRESS, false)
            }
        };

        Ok(evaluation)
    }
}
