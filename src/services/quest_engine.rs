//! Quest evaluation engine.
//!
//! Runs evaluation passes over a user's active quests: classify, score,
//! and either record progress or complete the quest and award its XP.
//!
//! Completion and the XP award form one logical unit. The quest is first
//! flipped to completed with a compare-and-set, so concurrent passes award
//! XP at most once. If the award then fails the completion is rolled back.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Quest, QuestKind};
use crate::domain::ports::{ExperienceRepository, MetricsProvider, QuestRepository};
use crate::services::experience_ledger::ExperienceLedger;
use crate::services::metrics_snapshot::MetricsSnapshot;
use crate::services::progress_evaluator::ProgressEvaluator;
use crate::services::quest_classifier::QuestClassifier;

/// Highest progress recorded for a quest that has not met its condition.
///
/// Progress 100 means completed, and completion only happens through the
/// XP-awarding path.
const MAX_OPEN_PROGRESS: u8 = 99;

/// A quest completed during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedQuest {
    pub quest_id: i64,
    pub title: String,
    pub kind: QuestKind,
    pub xp_awarded: u32,
}

/// A quest whose evaluation or persistence failed during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestFailure {
    pub quest_id: Option<i64>,
    pub title: String,
    /// Error kind, see [`DomainError::kind`]
    pub kind: String,
    pub message: String,
}

/// Summary of one evaluation pass.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationPassReport {
    pub pass_id: Uuid,
    pub user_id: i64,
    pub as_of: NaiveDate,
    /// Number of active quests examined
    pub evaluated: usize,
    pub completed: Vec<CompletedQuest>,
    /// Number of quests whose stored progress changed
    pub progressed: usize,
    pub failures: Vec<QuestFailure>,
    pub xp_awarded: u64,
    /// Level after the pass, if it could be read
    pub level: Option<u32>,
}

impl EvaluationPassReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

enum QuestOutcome {
    Completed(CompletedQuest),
    Progressed,
    Unchanged,
}

pub struct QuestEngine<Q, M, E>
where
    Q: QuestRepository,
    M: MetricsProvider,
    E: ExperienceRepository,
{
    quests: Arc<Q>,
    metrics: Arc<M>,
    ledger: Arc<ExperienceLedger<E>>,
    classifier: QuestClassifier,
    evaluator: ProgressEvaluator,
}

impl<Q, M, E> QuestEngine<Q, M, E>
where
    Q: QuestRepository,
    M: MetricsProvider,
    E: ExperienceRepository,
{
    pub fn new(quests: Arc<Q>, metrics: Arc<M>, ledger: Arc<ExperienceLedger<E>>) -> Self {
        Self {
            quests,
            metrics,
            ledger,
            classifier: QuestClassifier::new(),
            evaluator: ProgressEvaluator::new(),
        }
    }

    /// Run an evaluation pass for `user_id` as of today (local time).
    pub async fn run_evaluation_pass(&self, user_id: i64) -> DomainResult<EvaluationPassReport> {
        self.run_evaluation_pass_on(user_id, Local::now().date_naive()).await
    }

    /// Run an evaluation pass with metrics taken as of `as_of`.
    ///
    /// Only a failure to list the user's active quests aborts the pass.
    /// Per-quest failures are logged and collected in the report.
    pub async fn run_evaluation_pass_on(
        &self,
        user_id: i64,
        as_of: NaiveDate,
    ) -> DomainResult<EvaluationPassReport> {
        let pass_id = Uuid::new_v4();
        let span = info_span!("evaluation_pass", %pass_id, user_id, %as_of);

        async move {
            let active = self.quests.list_active(user_id).await?;
            debug!(count = active.len(), "loaded active quests");

            let snapshot = MetricsSnapshot::new(
                self.metrics.as_ref(),
                self.ledger.repository(),
                user_id,
                as_of,
            );

            let mut report = EvaluationPassReport {
                pass_id,
                user_id,
                as_of,
                evaluated: active.len(),
                completed: Vec::new(),
                progressed: 0,
                failures: Vec::new(),
                xp_awarded: 0,
                level: None,
            };

            for quest in active {
                match self.process_quest(&quest, &snapshot).await {
                    Ok(QuestOutcome::Completed(done)) => {
                        report.xp_awarded += u64::from(done.xp_awarded);
                        report.completed.push(done);
                    }
                    Ok(QuestOutcome::Progressed) => report.progressed += 1,
                    Ok(QuestOutcome::Unchanged) => {}
                    Err(err) => {
                        warn!(quest_id = ?quest.id, title = %quest.title, error = %err, "quest evaluation failed");
                        report.failures.push(QuestFailure {
                            quest_id: quest.id,
                            title: quest.title.clone(),
                            kind: err.kind().to_string(),
                            message: err.to_string(),
                        });
                    }
                }
            }

            report.level = match self.ledger.get_experience(user_id).await {
                Ok(record) => Some(record.level),
                Err(err) => {
                    warn!(error = %err, "could not read level after pass");
                    None
                }
            };

            info!(
                evaluated = report.evaluated,
                completed = report.completed.len(),
                progressed = report.progressed,
                failed = report.failures.len(),
                xp_awarded = report.xp_awarded,
                "evaluation pass finished"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    async fn process_quest(
        &self,
        quest: &Quest,
        snapshot: &MetricsSnapshot<'_, M, E>,
    ) -> DomainResult<QuestOutcome> {
        let id = quest.require_id()?;
        if quest.is_completed() {
            return Ok(QuestOutcome::Unchanged);
        }

        let kind = self.classifier.classify(&quest.title, &quest.description);
        let evaluation = self.evaluator.evaluate(quest, kind, snapshot).await?;
        debug!(
            quest_id = id,
            %kind,
            progress = evaluation.progress,
            should_complete = evaluation.should_complete,
            "quest evaluated"
        );

        if evaluation.should_complete {
            return self.complete_quest(quest, id, kind).await;
        }

        let progress = evaluation.progress.min(MAX_OPEN_PROGRESS);
        if progress == quest.progress() {
            return Ok(QuestOutcome::Unchanged);
        }
        if self.quests.update_progress(id, quest.user_id, progress).await? {
            Ok(QuestOutcome::Progressed)
        } else {
            debug!(quest_id = id, "quest completed elsewhere, progress not recorded");
            Ok(QuestOutcome::Unchanged)
        }
    }

    async fn complete_quest(
        &self,
        quest: &Quest,
        id: i64,
        kind: QuestKind,
    ) -> DomainResult<QuestOutcome> {
        let user_id = quest.user_id;
        if !self.quests.mark_completed(id, user_id).await? {
            debug!(quest_id = id, "quest already completed, skipping award");
            return Ok(QuestOutcome::Unchanged);
        }

        match self.ledger.add_xp(user_id, i64::from(quest.xp_reward)).await {
            Ok(level) => {
                info!(quest_id = id, xp = quest.xp_reward, level, "quest completed");
                Ok(QuestOutcome::Completed(CompletedQuest {
                    quest_id: id,
                    title: quest.title.clone(),
                    kind,
                    xp_awarded: quest.xp_reward,
                }))
            }
            Err(award_err) => {
                if let Err(rollback_err) = self.quests.reopen(id, user_id, quest.progress()).await {
                    error!(
                        quest_id = id,
                        error = %rollback_err,
                        "failed to roll back completion after xp award failure"
                    );
                }
                Err(DomainError::PersistenceFailure(format!(
                    "xp award for quest {id} failed: {award_err}"
                )))
            }
        }
    }
}
