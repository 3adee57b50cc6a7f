//! Quest domain model.
//!
//! A quest is a gamified task tied to a user's financial behaviour. Quests
//! carry an XP reward and a completion condition that the engine derives
//! from the quest's text (see [`QuestKind`]).

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Cadence of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    Daily,
    Weekly,
    Monthly,
}

impl Default for QuestType {
    fn default() -> Self {
        Self::Daily
    }
}

impl QuestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Default deadline for a quest of this cadence starting on `start`.
    ///
    /// Daily quests end the same day, weekly quests six days later, and
    /// monthly quests on the last day of the month.
    pub fn default_deadline(&self, start: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => start,
            Self::Weekly => start.checked_add_days(Days::new(6)).unwrap_or(start),
            Self::Monthly => last_day_of_month(start),
        }
    }
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Semantic category of a quest, derived from its title and description.
///
/// The kind is never persisted; it is recomputed on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    QuizCompletion,
    SavingsThreshold,
    BudgetAdherence,
    TransactionVolume,
    TransactionPresence,
    LevelTarget,
    GoalCompletion,
    Unclassified,
}

impl QuestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuizCompletion => "quiz_completion",
            Self::SavingsThreshold => "savings_threshold",
            Self::BudgetAdherence => "budget_adherence",
            Self::TransactionVolume => "transaction_volume",
            Self::TransactionPresence => "transaction_presence",
            Self::LevelTarget => "level_target",
            Self::GoalCompletion => "goal_completion",
            Self::Unclassified => "unclassified",
        }
    }

    /// Whether quests of this kind can ever be completed automatically.
    pub fn is_automated(&self) -> bool {
        !matches!(self, Self::GoalCompletion | Self::Unclassified)
    }
}

impl std::fmt::Display for QuestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trackable gamified task owned by exactly one user.
///
/// `completed` and `progress` are kept in lockstep: a quest is completed
/// if and only if its progress is 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Store-assigned identifier, `None` until the quest is created
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub quest_type: QuestType,
    pub xp_reward: u32,
    /// Count, currency amount or level, depending on the quest kind
    pub required_amount: f64,
    completed: bool,
    progress: u8,
    pub deadline: Option<NaiveDate>,
    pub user_id: i64,
}

impl Quest {
    /// Create a new, unsaved quest for `user_id`.
    pub fn new(user_id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            quest_type: QuestType::default(),
            xp_reward: 0,
            required_amount: 0.0,
            completed: false,
            progress: 0,
            deadline: None,
            user_id,
        }
    }

    pub fn with_type(mut self, quest_type: QuestType) -> Self {
        self.quest_type = quest_type;
        self
    }

    pub fn with_xp_reward(mut self, xp_reward: u32) -> Self {
        self.xp_reward = xp_reward;
        self
    }

    pub fn with_required_amount(mut self, required_amount: f64) -> Self {
        self.required_amount = required_amount;
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Rebuild a quest from persisted state, re-establishing the
    /// completed/progress invariant.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: i64,
        user_id: i64,
        title: String,
        description: String,
        quest_type: QuestType,
        xp_reward: u32,
        required_amount: f64,
        completed: bool,
        progress: i64,
        deadline: Option<NaiveDate>,
    ) -> Self {
        let mut quest = Self {
            id: Some(id),
            title,
            description,
            quest_type,
            xp_reward,
            required_amount,
            completed: false,
            progress: 0,
            deadline,
            user_id,
        };
        quest.set_progress(progress);
        if completed {
            quest.set_completed(true);
        }
        quest
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Set the completion flag.
    ///
    /// Completing forces progress to 100; reopening a completed quest
    /// resets its progress to 0.
    pub fn set_completed(&mut self, completed: bool) {
        if completed {
            self.completed = true;
            self.progress = 100;
        } else if self.completed {
            self.completed = false;
            self.progress = 0;
        }
    }

    /// Set progress, clamped to `[0, 100]`.
    ///
    /// Reaching 100 completes the quest; dropping below 100 reopens it.
    pub fn set_progress(&mut self, progress: i64) {
        let clamped = progress.clamp(0, 100) as u8;
        self.progress = clamped;
        self.completed = clamped == 100;
    }

    /// Whether the deadline has passed without the quest being completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.deadline.is_some_and(|deadline| deadline < today)
    }

    /// The store-assigned id, or a validation error for unsaved quests.
    pub fn require_id(&self) -> DomainResult<i64> {
        self.id
            .ok_or_else(|| DomainError::ValidationFailed(format!("quest '{}' has not been saved", self.title)))
    }

    /// Check field-level invariants before persisting.
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::ValidationFailed("quest title cannot be empty".to_string()));
        }
        if !self.required_amount.is_finite() || self.required_amount < 0.0 {
            return Err(DomainError::ValidationFailed(format!(
                "required amount must be a non-negative number, got {}",
                self.required_amount
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_quest_defaults() {
        let quest = Quest::new(1, "Daily Log Quest", "Log a transaction today");
        assert!(quest.id.is_none());
        assert!(!quest.is_completed());
        assert_eq!(quest.progress(), 0);
        assert_eq!(quest.quest_type, QuestType::Daily);
    }

    #[test]
    fn test_completing_forces_full_progress() {
        let mut quest = Quest::new(1, "q", "");
        quest.set_progress(40);
        quest.set_completed(true);
        assert_eq!(quest.progress(), 100);
        assert!(quest.is_completed());
    }

    #[test]
    fn test_full_progress_forces_completion() {
        let mut quest = Quest::new(1, "q", "");
        quest.set_progress(100);
        assert!(quest.is_completed());

        quest.set_progress(60);
        assert!(!quest.is_completed());
        assert_eq!(quest.progress(), 60);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut quest = Quest::new(1, "q", "");
        quest.set_progress(-20);
        assert_eq!(quest.progress(), 0);
        quest.set_progress(450);
        assert_eq!(quest.progress(), 100);
        assert!(quest.is_completed());
    }

    #[test]
    fn test_reopen_resets_progress() {
        let mut quest = Quest::new(1, "q", "");
        quest.set_completed(true);
        quest.set_completed(false);
        assert!(!quest.is_completed());
        assert_eq!(quest.progress(), 0);
    }

    #[test]
    fn test_restore_keeps_invariant() {
        let quest = Quest::restore(
            9, 1, "q".into(), String::new(), QuestType::Weekly, 10, 1.0, true, 30, None,
        );
        assert!(quest.is_completed());
        assert_eq!(quest.progress(), 100);
    }

    #[test]
    fn test_default_deadlines() {
        let start = date(2024, 2, 10);
        assert_eq!(QuestType::Daily.default_deadline(start), start);
        assert_eq!(QuestType::Weekly.default_deadline(start), date(2024, 2, 16));
        assert_eq!(QuestType::Monthly.default_deadline(start), date(2024, 2, 29));
        assert_eq!(QuestType::Monthly.default_deadline(date(2023, 12, 5)), date(2023, 12, 31));
    }

    #[test]
    fn test_overdue() {
        let quest = Quest::new(1, "q", "").with_deadline(date(2024, 1, 1));
        assert!(quest.is_overdue(date(2024, 1, 2)));
        assert!(!quest.is_overdue(date(2024, 1, 1)));
    }

    #[test]
    fn test_validation() {
        assert!(Quest::new(1, "  ", "").validate().is_err());
        assert!(Quest::new(1, "ok", "").with_required_amount(-1.0).validate().is_err());
        assert!(Quest::new(1, "ok", "").with_required_amount(3.0).validate().is_ok());
    }

    #[test]
    fn test_quest_type_parsing() {
        assert_eq!(QuestType::from_str("WEEKLY"), Some(QuestType::Weekly));
        assert_eq!(QuestType::from_str("yearly"), None);
        assert_eq!(QuestType::Monthly.as_str(), "monthly");
    }
}
