pub mod config;
pub mod experience;
pub mod quest;

pub use config::{Config, DatabaseConfig, LoggingConfig, QuestConfig};
pub use experience::{level_for_xp, xp_for_next_level, ExperienceRecord, MAX_LEVEL, XP_PER_LEVEL_UNIT};
pub use quest::{Quest, QuestKind, QuestType};
