//! Sample quest catalogue.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Quest, QuestType};
use crate::domain::ports::QuestRepository;

struct SampleQuest {
    title: &'static str,
    description: &'static str,
    quest_type: QuestType,
    xp_reward: u32,
    required_amount: f64,
}

const CATALOGUE: &[SampleQuest] = &[
    SampleQuest {
        title: "Daily Log Quest",
        description: "Log a transaction today to keep your records current.",
        quest_type: QuestType::Daily,
        xp_reward: 20,
        required_amount: 1.0,
    },
    SampleQuest {
        title: "Transaction Master",
        description: "Record at least 10 transactions.",
        quest_type: QuestType::Weekly,
        xp_reward: 60,
        required_amount: 10.0,
    },
    SampleQuest {
        title: "Budget Guardian",
        description: "Keep your expenses below your income this month.",
        quest_type: QuestType::Monthly,
        xp_reward: 150,
        required_amount: 0.0,
    },
    SampleQuest {
        title: "Save $100",
        description: "Put aside at least $100 of this month's income.",
        quest_type: QuestType::Monthly,
        xp_reward: 120,
        required_amount: 100.0,
    },
    SampleQuest {
        title: "Knowledge Seeker",
        description: "Complete 3 quizzes about personal finance.",
        quest_type: QuestType::Weekly,
        xp_reward: 75,
        required_amount: 3.0,
    },
    SampleQuest {
        title: "Rising Star",
        description: "Reach level 5.",
        quest_type: QuestType::Monthly,
        xp_reward: 200,
        required_amount: 5.0,
    },
];

/// Creates the sample quest catalogue for users who have none.
pub struct QuestSeeder<Q: QuestRepository> {
    repo: Arc<Q>,
}

impl<Q: QuestRepository> QuestSeeder<Q> {
    pub fn new(repo: Arc<Q>) -> Self {
        Self { repo }
    }

    /// Number of quests in the catalogue.
    pub fn catalogue_size() -> usize {
        CATALOGUE.len()
    }

    /// Seed the catalogue for `user_id` with deadlines starting at `today`.
    ///
    /// Does nothing when the user already owns quests. Returns the ids of
    /// the quests created.
    pub async fn seed(&self, user_id: i64, today: NaiveDate) -> DomainResult<Vec<i64>> {
        if !self.repo.list_for_user(user_id).await?.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(CATALOGUE.len());
        for sample in CATALOGUE {
            let quest = Quest::new(user_id, sample.title, sample.description)
                .with_type(sample.quest_type)
                .with_xp_reward(sample.xp_reward)
                .with_required_amount(sample.required_amount)
                .with_deadline(sample.quest_type.default_deadline(today));
            ids.push(self.repo.create(&quest).await?);
        }

        info!(user_id, count = ids.len(), "seeded sample quests");
        Ok(ids)
    }
}
