//! Wiring of configuration, database and services for CLI commands.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

use crate::adapters::sqlite::{
    initialize_database, SqliteActivityRepository, SqliteExperienceRepository, SqliteQuestRepository,
};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{ExperienceLedger, QuestEngine, QuestSeeder};

pub type SqliteQuestEngine = QuestEngine<SqliteQuestRepository, SqliteActivityRepository, SqliteExperienceRepository>;

/// Repositories and services built from one loaded configuration.
pub struct AppContext {
    pub config: Config,
    pub pool: SqlitePool,
    pub quests: Arc<SqliteQuestRepository>,
    pub activity: Arc<SqliteActivityRepository>,
    pub ledger: Arc<ExperienceLedger<SqliteExperienceRepository>>,
}

impl AppContext {
    /// Load configuration (from `config_path` when given) and open the database.
    pub async fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Self::from_config(config).await
    }

    pub async fn from_config(config: Config) -> Result<Self> {
        let pool = initialize_database(&config.database)
            .await
            .with_context(|| format!("Failed to open database at {}. Run 'questline init' first.", config.database.path))?;

        let experience = Arc::new(SqliteExperienceRepository::new(pool.clone()));
        let ledger = ExperienceLedger::new(experience).with_quiz_xp_reward(config.quests.quiz_xp_reward);

        Ok(Self {
            quests: Arc::new(SqliteQuestRepository::new(pool.clone())),
            activity: Arc::new(SqliteActivityRepository::new(pool.clone())),
            ledger: Arc::new(ledger),
            config,
            pool,
        })
    }

    pub fn engine(&self) -> SqliteQuestEngine {
        QuestEngine::new(self.quests.clone(), self.activity.clone(), self.ledger.clone())
    }

    pub fn seeder(&self) -> QuestSeeder<SqliteQuestRepository> {
        QuestSeeder::new(self.quests.clone())
    }
}
