use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MasteryError {
    #[error("quiz has no questions")]
    EmptyQuiz,

    #[error("correct answers ({correct}) exceed question count ({total})")]
    CorrectExceedsTotal { correct: usize, total: usize },
}

/// Best-ever quiz performance on a topic, always within 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MasteryScore(u8);

impl MasteryScore {
    pub const MAX: u8 = 100;
    pub const ZERO: Self = Self(0);

    /// Clamps an arbitrary percentage into the valid range.
    #[must_use]
    pub fn clamped(percent: i64) -> Self {
        let value = percent.clamp(0, i64::from(Self::MAX));
        Self(u8::try_from(value).unwrap_or(Self::MAX))
    }

    /// Percentage of correct answers, rounded half up (`2/3` gives 67).
    ///
    /// # Errors
    ///
    /// Returns `MasteryError::EmptyQuiz` when `total` is zero and
    /// `MasteryError::CorrectExceedsTotal` when `correct > total`.
    pub fn from_quiz(correct: usize, total: usize) -> Result<Self, MasteryError> {
        if total == 0 {
            return Err(MasteryError::EmptyQuiz);
        }
        if correct > total {
            return Err(MasteryError::CorrectExceedsTotal { correct, total });
        }
        let percent = (200 * correct + total) / (2 * total);
        Ok(Self::clamped(i64::try_from(percent).unwrap_or(i64::MAX)))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn tier(self) -> MasteryTier {
        match self.0 {
            0 => MasteryTier::NotStarted,
            1..=79 => MasteryTier::InProgress,
            _ => MasteryTier::Mastered,
        }
    }
}

impl TryFrom<u8> for MasteryScore {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(format!("mastery score {value} is above {}", Self::MAX));
        }
        Ok(Self(value))
    }
}

impl From<MasteryScore> for u8 {
    fn from(score: MasteryScore) -> Self {
        score.0
    }
}

impl fmt::Display for MasteryScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Dashboard band for a topic's mastery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasteryTier {
    NotStarted,
    InProgress,
    /// 80% or better.
    Mastered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_of_three_rounds_to_sixty_seven() {
        assert_eq!(MasteryScore::from_quiz(2, 3).unwrap().value(), 67);
        assert_eq!(MasteryScore::from_quiz(1, 3).unwrap().value(), 33);
        assert_eq!(MasteryScore::from_quiz(1, 8).unwrap().value(), 13);
        assert_eq!(MasteryScore::from_quiz(5, 5).unwrap().value(), 100);
        assert_eq!(MasteryScore::from_quiz(0, 4).unwrap().value(), 0);
    }

    #[test]
    fn empty_or_overfull_quiz_is_rejected() {
        assert_eq!(MasteryScore::from_quiz(0, 0), Err(MasteryError::EmptyQuiz));
        assert!(matches!(
            MasteryScore::from_quiz(4, 3),
            Err(MasteryError::CorrectExceedsTotal { correct: 4, total: 3 })
        ));
    }

    #[test]
    fn clamped_stays_in_range() {
        assert_eq!(MasteryScore::clamped(150).value(), 100);
        assert_eq!(MasteryScore::clamped(-5).value(), 0);
        assert_eq!(MasteryScore::clamped(42).value(), 42);
    }

    #[test]
    fn tiers_follow_dashboard_bands() {
        assert_eq!(MasteryScore::ZERO.tier(), MasteryTier::NotStarted);
        assert_eq!(MasteryScore::clamped(79).tier(), MasteryTier::InProgress);
        assert_eq!(MasteryScore::clamped(80).tier(), MasteryTier::Mastered);
    }

    #[test]
    fn deserializing_out_of_range_fails() {
        assert!(serde_json::from_str::<MasteryScore>("101").is_err());
        assert_eq!(serde_json::from_str::<MasteryScore>("55").unwrap().value(), 55);
    }
}
