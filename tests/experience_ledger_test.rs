mod helpers;

use std::sync::Arc;

use questline::adapters::sqlite::SqliteExperienceRepository;
use questline::domain::errors::DomainError;
use questline::domain::ports::ExperienceRepository;
use questline::services::ExperienceLedger;

use helpers::database::{setup_test_db, teardown_test_db};

#[tokio::test]
async fn test_new_user_starts_at_zero() {
    let pool = setup_test_db().await;
    let repo = SqliteExperienceRepository::new(pool.clone());

    assert!(repo.get(1).await.unwrap().is_none());

    let ledger = ExperienceLedger::new(Arc::new(repo));
    let record = ledger.get_experience(1).await.unwrap();
    assert_eq!(record.current_xp, 0);
    assert_eq!(record.level, 0);
    assert!(ledger.repository().get(1).await.unwrap().is_some());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_add_xp_accumulates_and_levels_up() {
    let pool = setup_test_db().await;
    let ledger = ExperienceLedger::new(Arc::new(SqliteExperienceRepository::new(pool.clone())));

    assert_eq!(ledger.add_xp(1, 99).await.unwrap(), 0);
    assert_eq!(ledger.add_xp(1, 1).await.unwrap(), 1);
    assert_eq!(ledger.add_xp(1, 300).await.unwrap(), 2);
    assert_eq!(ledger.add_xp(1, 0).await.unwrap(), 2);

    let record = ledger.get_experience(1).await.unwrap();
    assert_eq!(record.current_xp, 400);
    assert_eq!(record.level, 2);
    assert_eq!(ExperienceLedger::<SqliteExperienceRepository>::xp_for_next_level(record.level), 900);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_negative_award_leaves_state_unchanged() {
    let pool = setup_test_db().await;
    let ledger = ExperienceLedger::new(Arc::new(SqliteExperienceRepository::new(pool.clone())));

    ledger.add_xp(1, 150).await.unwrap();
    let err = ledger.add_xp(1, -50).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidAmount(-50)));

    let record = ledger.get_experience(1).await.unwrap();
    assert_eq!(record.current_xp, 150);
    assert_eq!(record.level, 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_set_experience_overwrites_total() {
    let pool = setup_test_db().await;
    let ledger = ExperienceLedger::new(Arc::new(SqliteExperienceRepository::new(pool.clone())));

    assert!(matches!(
        ledger.set_experience(3, 500).await,
        Err(DomainError::ExperienceNotFound(3))
    ));

    ledger.add_xp(3, 2500).await.unwrap();
    let record = ledger.set_experience(3, 120).await.unwrap();
    assert_eq!(record.current_xp, 120);
    assert_eq!(record.level, 1);
    assert!(matches!(
        ledger.set_experience(3, -1).await,
        Err(DomainError::InvalidAmount(-1))
    ));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_quiz_award_uses_configured_reward() {
    let pool = setup_test_db().await;
    let ledger = ExperienceLedger::new(Arc::new(SqliteExperienceRepository::new(pool.clone())))
        .with_quiz_xp_reward(50);

    ledger.award_quiz_completion(9).await.unwrap();
    ledger.award_quiz_completion(9).await.unwrap();
    assert_eq!(ledger.get_experience(9).await.unwrap().current_xp, 100);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_users_are_independent() {
    let pool = setup_test_db().await;
    let ledger = ExperienceLedger::new(Arc::new(SqliteExperienceRepository::new(pool.clone())));

    ledger.add_xp(1, 900).await.unwrap();
    ledger.add_xp(2, 100).await.unwrap();

    assert_eq!(ledger.get_experience(1).await.unwrap().level, 3);
    assert_eq!(ledger.get_experience(2).await.unwrap().level, 1);

    teardown_test_db(pool).await;
}
