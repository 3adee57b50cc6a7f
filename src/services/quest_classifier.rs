//! Quest classification.
//!
//! Maps free-text quest titles and descriptions onto a [`QuestKind`] with
//! case-insensitive substring matching. Rules are checked in a fixed order
//! and the first match wins, since quest text often mixes keywords
//! ("save" and "quiz" in the same title, for example).

use crate::domain::models::QuestKind;

/// Ordered keyword rules. Earlier entries take precedence.
const RULES: &[(QuestKind, &[&str])] = &[
    (QuestKind::QuizCompletion, &["quiz", "quizzes"]),
    (QuestKind::SavingsThreshold, &["save money", "savings", "save $"]),
    (
        QuestKind::BudgetAdherence,
        &[
            "budget guardian",
            "budget streak",
            "stay under budget",
            "keep your expenses below",
        ],
    ),
    (
        QuestKind::TransactionVolume,
        &[
            "transaction master",
            "log transactions",
            "record at least",
            "log multiple transactions",
        ],
    ),
    (
        QuestKind::TransactionPresence,
        &["daily log", "log a transaction", "log all your expenses"],
    ),
    (QuestKind::LevelTarget, &["reach level"]),
    (QuestKind::GoalCompletion, &["complete all goals"]),
];

/// Marker that restricts a transaction-presence quest to today's activity.
pub const DAILY_LOG_MARKER: &str = "daily log";

/// Stateless classifier from quest text to [`QuestKind`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestClassifier;

impl QuestClassifier {
    pub const fn new() -> Self {
        Self
    }

    /// Classify a quest by its title and description.
    pub fn classify(&self, title: &str, description: &str) -> QuestKind {
        let text = format!("{title} {description}").to_lowercase();
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
            .map_or(QuestKind::Unclassified, |(kind, _)| *kind)
    }

    /// Whether a title asks for activity today rather than all-time.
    pub fn is_daily_log(title: &str) -> bool {
        title.to_lowercase().contains(DAILY_LOG_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(title: &str, description: &str) -> QuestKind {
        QuestClassifier::new().classify(title, description)
    }

    #[test]
    fn test_each_kind_is_recognised() {
        assert_eq!(classify("Complete 3 quizzes", ""), QuestKind::QuizCompletion);
        assert_eq!(classify("Save $50", ""), QuestKind::SavingsThreshold);
        assert_eq!(classify("Budget Guardian", ""), QuestKind::BudgetAdherence);
        assert_eq!(classify("Transaction Master", ""), QuestKind::TransactionVolume);
        assert_eq!(classify("Daily Log Quest", ""), QuestKind::TransactionPresence);
        assert_eq!(classify("Reach level 5", ""), QuestKind::LevelTarget);
        assert_eq!(classify("Complete all goals", ""), QuestKind::GoalCompletion);
        assert_eq!(classify("Drink water", "stay hydrated"), QuestKind::Unclassified);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(classify("SAVE MONEY this week", ""), QuestKind::SavingsThreshold);
        assert_eq!(classify("reach LEVEL 3", ""), QuestKind::LevelTarget);
    }

    #[test]
    fn test_description_participates_in_matching() {
        assert_eq!(
            classify("Weekly challenge", "Keep your expenses below your income"),
            QuestKind::BudgetAdherence
        );
        assert_eq!(
            classify("Bookkeeper", "Record at least 5 transactions"),
            QuestKind::TransactionVolume
        );
    }

    #[test]
    fn test_precedence_when_keywords_overlap() {
        // Quiz beats savings.
        assert_eq!(classify("Save money quiz", ""), QuestKind::QuizCompletion);
        // Savings beats budget.
        assert_eq!(
            classify("Budget streak", "Grow your savings"),
            QuestKind::SavingsThreshold
        );
        // Volume beats presence.
        assert_eq!(
            classify("Daily log", "Log multiple transactions"),
            QuestKind::TransactionVolume
        );
    }

    #[test]
    fn test_bare_save_is_not_savings() {
        assert_eq!(classify("Save the date", ""), QuestKind::Unclassified);
    }

    #[test]
    fn test_daily_log_marker() {
        assert!(QuestClassifier::is_daily_log("Daily Log Quest"));
        assert!(!QuestClassifier::is_daily_log("Log a transaction"));
    }
}
