//! SQLite database adapters for the Questline engine.

pub mod activity_repository;
pub mod connection;
pub mod experience_repository;
pub mod migrations;
pub mod quest_repository;

pub use activity_repository::{Direction, SqliteActivityRepository};
pub use connection::{
    create_pool, create_pool_from_config, create_test_pool, verify_connection, ConnectionError, PoolConfig,
};
pub use experience_repository::SqliteExperienceRepository;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use quest_repository::SqliteQuestRepository;

use sqlx::SqlitePool;

use crate::domain::models::DatabaseConfig;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool_from_config(config).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}
