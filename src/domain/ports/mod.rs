//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - QuestRepository: quest persistence (the quest store)
//! - ExperienceRepository: per-user XP and level persistence
//! - MetricsProvider: read-only activity aggregates
//!
//! These traits define the contracts that allow the domain to be independent
//! of specific infrastructure implementations.

pub mod experience_repository;
pub mod metrics_provider;
pub mod quest_repository;

pub use experience_repository::ExperienceRepository;
pub use metrics_provider::MetricsProvider;
pub use quest_repository::QuestRepository;

#[cfg(test)]
pub use experience_repository::MockExperienceRepository;
#[cfg(test)]
pub use metrics_provider::MockMetricsProvider;
#[cfg(test)]
pub use quest_repository::MockQuestRepository;
