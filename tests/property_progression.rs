use proptest::prelude::*;
use questline::domain::models::{level_for_xp, xp_for_next_level, Quest, MAX_LEVEL};
use questline::services::progress_evaluator::{
    budget_adherence, level_target, percent, quiz_completion, savings_threshold,
    transaction_volume,
};
use questline::services::QuestClassifier;

proptest! {
    /// Property: a level is reached exactly at its threshold
    #[test]
    fn prop_level_boundaries(level in 0u32..MAX_LEVEL) {
        let threshold = xp_for_next_level(level);
        prop_assert_eq!(level_for_xp(threshold - 1), level);
        prop_assert_eq!(level_for_xp(threshold), level + 1);
    }

    /// Property: thresholds past the reachable range saturate instead of wrapping
    #[test]
    fn prop_unreachable_levels_saturate(level in MAX_LEVEL..=u32::MAX) {
        prop_assert_eq!(xp_for_next_level(level), u64::MAX);
    }

    /// Property: level never decreases as XP grows
    #[test]
    fn prop_level_monotonic(xp in 0u64..u64::MAX / 2, extra in 0u64..1_000_000) {
        prop_assert!(level_for_xp(xp) <= level_for_xp(xp + extra));
    }

    /// Property: percentages always land in 0..=100
    #[test]
    fn prop_percent_bounded(n in any::<f64>(), d in any::<f64>()) {
        prop_assert!(percent(n, d) <= 100);
    }

    /// Property: evaluator progress stays bounded for any metric values
    #[test]
    fn prop_evaluations_bounded(
        income in -1e9f64..1e9,
        expenses in -1e9f64..1e9,
        required in -1e6f64..1e6,
        count in 0u64..1_000_000,
        level in 0u32..1_000,
    ) {
        for eval in [
            budget_adherence(income, expenses),
            savings_threshold(income, expenses, required),
            transaction_volume(count, required),
            quiz_completion(count, required),
            level_target(level, required),
        ] {
            prop_assert!(eval.progress <= 100);
        }
    }

    /// Property: stored progress stays in range and 100 always means completed
    #[test]
    fn prop_quest_progress_consistent(value in any::<i64>()) {
        let mut quest = Quest::new(1, "Quest", "");
        quest.set_progress(value);
        prop_assert!(quest.progress() <= 100);
        prop_assert_eq!(quest.is_completed(), quest.progress() == 100);
    }

    /// Property: classification ignores case
    #[test]
    fn prop_classification_case_insensitive(title in "[a-zA-Z $]{0,40}", desc in "[a-zA-Z ]{0,40}") {
        let classifier = QuestClassifier::new();
        prop_assert_eq!(
            classifier.classify(&title, &desc),
            classifier.classify(&title.to_uppercase(), &desc.to_lowercase())
        );
    }
}
