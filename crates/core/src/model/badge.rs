use crate::model::mastery::MasteryScore;
use crate::model::topic::{Topic, TopicCategory};

/// Badges a learner can earn. Stored on the learner by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    FirstStar,
    MathWizard,
    DecimalDynamo,
    GeometryGenius,
}

impl Badge {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Badge::FirstStar => "🌟 First Star",
            Badge::MathWizard => "🧙 Math Wizard",
            Badge::DecimalDynamo => "💎 Decimal Dynamo",
            Badge::GeometryGenius => "📐 Geometry Genius",
        }
    }

    /// Awarded for finishing a lesson; the learner keeps only the first one.
    #[must_use]
    pub fn for_lesson() -> Self {
        Badge::FirstStar
    }

    /// Badges earned by a single quiz result on `topic`.
    ///
    /// A perfect quiz earns the wizard badge; reaching the mastered band on a
    /// number or geometry topic earns that category's badge.
    #[must_use]
    pub fn for_quiz(topic: &Topic, score: MasteryScore) -> Vec<Self> {
        let mut earned = Vec::new();
        if score.value() == MasteryScore::MAX {
            earned.push(Badge::MathWizard);
        }
        if score.tier() == crate::model::MasteryTier::Mastered {
            match topic.category() {
                TopicCategory::Number => earned.push(Badge::DecimalDynamo),
                TopicCategory::Geometry => earned.push(Badge::GeometryGenius),
                TopicCategory::Algebra | TopicCategory::Data => {}
            }
        }
        earned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::find_topic;
    use crate::model::TopicId;

    #[test]
    fn perfect_number_quiz_earns_two_badges() {
        let topic = find_topic(&TopicId::new("topic-1")).unwrap();
        let earned = Badge::for_quiz(&topic, MasteryScore::clamped(100));
        assert_eq!(earned, vec![Badge::MathWizard, Badge::DecimalDynamo]);
    }

    #[test]
    fn partial_algebra_quiz_earns_nothing() {
        let topic = find_topic(&TopicId::new("topic-3")).unwrap();
        assert!(Badge::for_quiz(&topic, MasteryScore::clamped(67)).is_empty());
        assert!(Badge::for_quiz(&topic, MasteryScore::clamped(90)).is_empty());
    }

    #[test]
    fn geometry_mastery_earns_geometry_badge() {
        let topic = find_topic(&TopicId::new("topic-4")).unwrap();
        assert_eq!(
            Badge::for_quiz(&topic, MasteryScore::clamped(80)),
            vec![Badge::GeometryGenius]
        );
    }
}
