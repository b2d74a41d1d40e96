use academy_core::curriculum::curriculum;
use academy_core::model::{Learner, MasteryScore, MasteryTier, Topic};

/// One row of the topic dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardEntry {
    pub topic: Topic,
    pub mastery: MasteryScore,
    pub tier: MasteryTier,
}

/// Every curriculum topic with the learner's mastery, in catalog order.
#[must_use]
pub fn dashboard_for(learner: &Learner) -> Vec<DashboardEntry> {
    curriculum()
        .into_iter()
        .map(|topic| {
            let mastery = learner.mastery(topic.id());
            DashboardEntry {
                topic,
                mastery,
                tier: mastery.tier(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_core::model::TopicId;

    #[test]
    fn unattempted_topics_show_as_not_started() {
        let learner = Learner::named("Mia")
            .unwrap()
            .with_mastery(&TopicId::new("topic-2"), MasteryScore::clamped(85));
        let rows = dashboard_for(&learner);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].tier, MasteryTier::NotStarted);
        assert_eq!(rows[1].mastery.value(), 85);
        assert_eq!(rows[1].tier, MasteryTier::Mastered);
    }
}
