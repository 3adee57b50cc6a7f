//! Domain errors for the Questline progression engine.

use thiserror::Error;

/// Domain-level errors that can occur in the quest and progression engine.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A negative XP delta (or XP total) was supplied.
    #[error("Invalid XP amount: {0}. Amount must be non-negative")]
    InvalidAmount(i64),

    #[error("Quest not found: {0}")]
    QuestNotFound(i64),

    #[error("Experience record not found for user {0}")]
    ExperienceNotFound(i64),

    /// A metrics query failed; scoped to the quest being evaluated.
    #[error("Metrics unavailable: {0}")]
    MetricsUnavailable(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Short machine-readable name of the error kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "invalid_amount",
            Self::QuestNotFound(_) | Self::ExperienceNotFound(_) => "not_found",
            Self::MetricsUnavailable(_) => "metrics_unavailable",
            Self::PersistenceFailure(_) => "persistence_failure",
            Self::ValidationFailed(_) => "validation_failed",
            Self::SerializationError(_) => "serialization_error",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceFailure(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(DomainError::InvalidAmount(-5).kind(), "invalid_amount");
        assert_eq!(DomainError::QuestNotFound(3).kind(), "not_found");
        assert_eq!(DomainError::ExperienceNotFound(3).kind(), "not_found");
        assert_eq!(
            DomainError::MetricsUnavailable("db down".into()).kind(),
            "metrics_unavailable"
        );
    }

    #[test]
    fn test_sqlx_errors_map_to_persistence_failure() {
        let err: DomainError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DomainError::PersistenceFailure(_)));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            DomainError::InvalidAmount(-10).to_string(),
            "Invalid XP amount: -10. Amount must be non-negative"
        );
        assert_eq!(DomainError::QuestNotFound(7).to_string(), "Quest not found: 7");
    }
}
