//! Quest and progression services.

pub mod experience_ledger;
pub mod metrics_snapshot;
pub mod progress_evaluator;
pub mod quest_classifier;
pub mod quest_engine;
pub mod quest_seeder;

pub use experience_ledger::ExperienceLedger;
pub use metrics_snapshot::MetricsSnapshot;
pub use progress_evaluator::{Evaluation, ProgressEvaluator};
pub use quest_classifier::QuestClassifier;
pub use quest_engine::{CompletedQuest, EvaluationPassReport, QuestEngine, QuestFailure};
pub use quest_seeder::QuestSeeder;
