//! End-to-end evaluation passes against an in-memory SQLite database.

mod helpers;

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use questline::adapters::sqlite::{
    Direction, SqliteActivityRepository, SqliteExperienceRepository, SqliteQuestRepository,
};
use questline::domain::models::{Quest, QuestKind, QuestType};
use questline::domain::ports::QuestRepository;
use questline::services::{ExperienceLedger, QuestEngine};
use sqlx::SqlitePool;

use helpers::database::{setup_test_db, teardown_test_db};

const USER: i64 = 7;

type Engine = QuestEngine<SqliteQuestRepository, SqliteActivityRepository, SqliteExperienceRepository>;

struct Harness {
    pool: SqlitePool,
    quests: Arc<SqliteQuestRepository>,
    activity: Arc<SqliteActivityRepository>,
    ledger: Arc<ExperienceLedger<SqliteExperienceRepository>>,
    engine: Engine,
}

impl Harness {
    async fn new() -> Self {
        let pool = setup_test_db().await;
        let quests = Arc::new(SqliteQuestRepository::new(pool.clone()));
        let activity = Arc::new(SqliteActivityRepository::new(pool.clone()));
        let ledger = Arc::new(ExperienceLedger::new(Arc::new(
            SqliteExperienceRepository::new(pool.clone()),
        )));
        let engine = QuestEngine::new(quests.clone(), activity.clone(), ledger.clone());
        Self {
            pool,
            quests,
            activity,
            ledger,
            engine,
        }
    }

    async fn add_quest(&self, title: &str, quest_type: QuestType, xp: u32, required: f64) -> i64 {
        let quest = Quest::new(USER, title, "")
            .with_type(quest_type)
            .with_xp_reward(xp)
            .with_required_amount(required);
        self.quests.create(&quest).await.expect("failed to create quest")
    }

    async fn quest(&self, id: i64) -> Quest {
        self.quests.get(id, USER).await.unwrap().expect("quest should exist")
    }

    async fn xp(&self) -> u64 {
        self.ledger.get_experience(USER).await.unwrap().current_xp
    }
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

#[tokio::test]
async fn test_daily_log_completes_after_transaction_today() {
    let h = Harness::new().await;
    let id = h.add_quest("Daily Log Quest", QuestType::Daily, 20, 1.0).await;

    // A transaction on another day does not count.
    h.activity
        .record_transaction(USER, 12.5, Direction::Expense, as_of().pred_opt().unwrap(), None)
        .await
        .unwrap();

    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert!(report.is_clean());
    assert!(report.completed.is_empty());
    let quest = h.quest(id).await;
    assert!(!quest.is_completed());
    assert_eq!(quest.progress(), 0);
    assert_eq!(h.xp().await, 0);

    h.activity
        .record_transaction(USER, 4.0, Direction::Expense, as_of(), Some("coffee"))
        .await
        .unwrap();

    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].kind, QuestKind::TransactionPresence);
    assert_eq!(report.xp_awarded, 20);
    let quest = h.quest(id).await;
    assert!(quest.is_completed());
    assert_eq!(quest.progress(), 100);
    assert_eq!(h.xp().await, 20);

    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert_eq!(report.evaluated, 0);
    assert_eq!(report.xp_awarded, 0);
    assert_eq!(h.xp().await, 20);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_savings_quest_completes_from_monthly_totals() {
    let h = Harness::new().await;
    let id = h.add_quest("Save $50", QuestType::Monthly, 120, 50.0).await;

    let day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
    h.activity
        .record_transaction(USER, 200.0, Direction::Income, day, Some("salary"))
        .await
        .unwrap();
    h.activity
        .record_transaction(USER, 100.0, Direction::Expense, day, Some("groceries"))
        .await
        .unwrap();
    // Previous month is outside the window.
    h.activity
        .record_transaction(
            USER,
            500.0,
            Direction::Expense,
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            None,
        )
        .await
        .unwrap();

    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].kind, QuestKind::SavingsThreshold);
    assert!(h.quest(id).await.is_completed());
    assert_eq!(h.xp().await, 120);
    assert_eq!(report.level, Some(1));

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_quiz_quest_records_partial_progress() {
    let h = Harness::new().await;
    let id = h.add_quest("Complete 3 quizzes", QuestType::Weekly, 75, 3.0).await;

    h.activity.record_quiz_completion(USER, "Budgeting 101").await.unwrap();
    h.activity.record_quiz_completion(USER, "Credit basics").await.unwrap();

    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert!(report.completed.is_empty());
    assert_eq!(report.progressed, 1);
    let quest = h.quest(id).await;
    assert!(!quest.is_completed());
    assert_eq!(quest.progress(), 66);

    // Same metrics, nothing to rewrite.
    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert_eq!(report.progressed, 0);

    h.activity.record_quiz_completion(USER, "Investing").await.unwrap();
    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert_eq!(report.completed.len(), 1);
    assert_eq!(h.xp().await, 75);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_level_quest_tracks_current_level() {
    let h = Harness::new().await;
    let id = h.add_quest("Reach level 5", QuestType::Monthly, 200, 5.0).await;

    // 400 XP is level 2.
    assert_eq!(h.ledger.add_xp(USER, 400).await.unwrap(), 2);

    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert!(report.completed.is_empty());
    assert_eq!(h.quest(id).await.progress(), 40);

    // 2500 XP is level 5.
    h.ledger.add_xp(USER, 2100).await.unwrap();
    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].kind, QuestKind::LevelTarget);
    assert_eq!(h.xp().await, 2700);
    assert_eq!(report.level, Some(5));

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_unmeasured_quests_never_complete() {
    let h = Harness::new().await;
    let id = h.add_quest("Read a finance book", QuestType::Weekly, 30, 1.0).await;

    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert!(report.completed.is_empty());
    let quest = h.quest(id).await;
    assert!(!quest.is_completed());
    assert_eq!(quest.progress(), 50);

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_concurrent_passes_award_xp_once() {
    let h = Harness::new().await;
    let id = h.add_quest("Daily Log Quest", QuestType::Daily, 20, 1.0).await;
    h.activity
        .record_transaction(USER, 9.0, Direction::Expense, as_of(), None)
        .await
        .unwrap();

    let engines: Vec<Engine> = (0..4)
        .map(|_| QuestEngine::new(h.quests.clone(), h.activity.clone(), h.ledger.clone()))
        .collect();
    let reports = join_all(engines.iter().map(|e| e.run_evaluation_pass_on(USER, as_of()))).await;

    let awarded: u64 = reports
        .into_iter()
        .map(|r| r.expect("pass should succeed").xp_awarded)
        .sum();
    assert_eq!(awarded, 20);
    assert_eq!(h.xp().await, 20);
    assert!(h.quest(id).await.is_completed());

    teardown_test_db(h.pool).await;
}

#[tokio::test]
async fn test_pass_touches_only_the_requested_user() {
    let h = Harness::new().await;
    let other = Quest::new(USER + 1, "Daily Log Quest", "")
        .with_xp_reward(20)
        .with_required_amount(1.0);
    let other_id = h.quests.create(&other).await.unwrap();
    h.activity
        .record_transaction(USER + 1, 3.0, Direction::Expense, as_of(), None)
        .await
        .unwrap();

    let report = h.engine.run_evaluation_pass_on(USER, as_of()).await.unwrap();
    assert_eq!(report.evaluated, 0);
    let untouched = h.quests.get(other_id, USER + 1).await.unwrap().unwrap();
    assert!(!untouched.is_completed());

    teardown_test_db(h.pool).await;
}
