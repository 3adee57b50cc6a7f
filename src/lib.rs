//! Questline - Quest & Progression Engine
//!
//! Questline tracks a user's gamified progress (experience points, level and
//! quest completion) in response to financial activity: transactions, budget
//! adherence, savings and quiz participation.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Quest and experience models, errors and port traits
//! - **Service Layer** (`services`): Classification, scoring, the XP ledger and the evaluation engine
//! - **Adapters** (`adapters`): SQLite implementations of the ports
//! - **Infrastructure Layer** (`infrastructure`): Configuration loading and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use questline::adapters::sqlite::*;
//! use questline::services::{ExperienceLedger, QuestEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = create_migrated_test_pool().await?;
//!     let ledger = Arc::new(ExperienceLedger::new(Arc::new(SqliteExperienceRepository::new(pool.clone()))));
//!     let engine = QuestEngine::new(
//!         Arc::new(SqliteQuestRepository::new(pool.clone())),
//!         Arc::new(SqliteActivityRepository::new(pool)),
//!         ledger,
//!     );
//!     let report = engine.run_evaluation_pass(1).await?;
//!     println!("awarded {} XP", report.xp_awarded);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    level_for_xp, xp_for_next_level, Config, DatabaseConfig, ExperienceRecord, LoggingConfig, Quest,
    QuestConfig, QuestKind, QuestType,
};
pub use domain::ports::{ExperienceRepository, MetricsProvider, QuestRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    EvaluationPassReport, ExperienceLedger, ProgressEvaluator, QuestClassifier, QuestEngine, QuestSeeder,
};
