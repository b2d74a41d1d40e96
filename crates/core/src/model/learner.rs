use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::model::ids::{LearnerId, LessonId, TopicId};
use crate::model::mastery::MasteryScore;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LearnerError {
    #[error("display name cannot be empty")]
    EmptyName,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Per-learner presentation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct LearnerSettings {
    pub sound_enabled: bool,
    pub voice_enabled: bool,
    pub high_contrast: bool,
}

impl Default for LearnerSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            voice_enabled: true,
            high_contrast: false,
        }
    }
}

//
// ─── TOPIC PROGRESS ────────────────────────────────────────────────────────────
//

/// Progress on one topic. Only exists inside a learner's progress map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicProgress {
    mastery_score: MasteryScore,
    completed_lessons: BTreeSet<LessonId>,
    quiz_scores: BTreeMap<String, MasteryScore>,
}

impl TopicProgress {
    #[must_use]
    pub fn mastery_score(&self) -> MasteryScore {
        self.mastery_score
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn quiz_scores(&self) -> &BTreeMap<String, MasteryScore> {
        &self.quiz_scores
    }
}

//
// ─── LEARNER ───────────────────────────────────────────────────────────────────
//

/// The single persisted learner record.
///
/// All mutators return a new value; the session controller decides when the
/// result is committed to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    id: LearnerId,
    display_name: String,
    avatar: String,
    is_guest: bool,
    progress: BTreeMap<TopicId, TopicProgress>,
    badges: Vec<String>,
    settings: LearnerSettings,
}

impl Learner {
    pub const DEFAULT_AVATAR: &'static str = "🐿️";
    pub const GUEST_NAME: &'static str = "Guest Learner";
    pub const GOOD_START_BADGE: &'static str = "🌟 Good Start!";

    /// Fresh named learner with no progress. The trimmed name doubles as id.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::EmptyName` if the name is blank.
    pub fn named(display_name: &str) -> Result<Self, LearnerError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(LearnerError::EmptyName);
        }
        Ok(Self::fresh(LearnerId::new(name), name.to_string(), false))
    }

    /// Fresh guest learner. A blank name falls back to `Guest Learner`.
    #[must_use]
    pub fn guest(display_name: &str) -> Self {
        let name = display_name.trim();
        let name = if name.is_empty() { Self::GUEST_NAME } else { name };
        Self::fresh(LearnerId::guest(), name.to_string(), true)
    }

    /// Resolves the identity a login request refers to without building a record.
    ///
    /// # Errors
    ///
    /// Returns `LearnerError::EmptyName` for a blank non-guest name.
    pub fn identity_for_login(display_name: &str, is_guest: bool) -> Result<LearnerId, LearnerError> {
        if is_guest {
            return Ok(LearnerId::guest());
        }
        let name = display_name.trim();
        if name.is_empty() {
            return Err(LearnerError::EmptyName);
        }
        Ok(LearnerId::new(name))
    }

    fn fresh(id: LearnerId, display_name: String, is_guest: bool) -> Self {
        Self {
            id,
            display_name,
            avatar: Self::DEFAULT_AVATAR.to_string(),
            is_guest,
            progress: BTreeMap::new(),
            badges: Vec::new(),
            settings: LearnerSettings::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &LearnerId {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.is_guest
    }

    #[must_use]
    pub fn progress(&self) -> &BTreeMap<TopicId, TopicProgress> {
        &self.progress
    }

    #[must_use]
    pub fn topic_progress(&self, topic_id: &TopicId) -> Option<&TopicProgress> {
        self.progress.get(topic_id)
    }

    /// Current mastery for a topic; zero when the topic was never attempted.
    #[must_use]
    pub fn mastery(&self, topic_id: &TopicId) -> MasteryScore {
        self.progress
            .get(topic_id)
            .map_or(MasteryScore::ZERO, TopicProgress::mastery_score)
    }

    #[must_use]
    pub fn badges(&self) -> &[String] {
        &self.badges
    }

    /// Earned badges plus the good-start marker once any topic has progress.
    #[must_use]
    pub fn display_badges(&self) -> Vec<String> {
        let mut shown = self.badges.clone();
        if !self.progress.is_empty() {
            shown.push(Self::GOOD_START_BADGE.to_string());
        }
        shown
    }

    #[must_use]
    pub fn settings(&self) -> LearnerSettings {
        self.settings
    }

    /// Returns a copy whose mastery for `topic_id` is the best of the stored
    /// score and `score`. The latest score is kept under the topic's quiz key.
    #[must_use]
    pub fn with_mastery(&self, topic_id: &TopicId, score: MasteryScore) -> Self {
        let mut next = self.clone();
        let entry = next.progress.entry(topic_id.clone()).or_default();
        entry.mastery_score = entry.mastery_score.max(score);
        entry.quiz_scores.insert(topic_id.as_str().to_string(), score);
        next
    }

    #[must_use]
    pub fn with_completed_lesson(&self, topic_id: &TopicId, lesson_id: &LessonId) -> Self {
        let mut next = self.clone();
        next.progress
            .entry(topic_id.clone())
            .or_default()
            .completed_lessons
            .insert(lesson_id.clone());
        next
    }

    /// Appends a badge unless it was already earned.
    #[must_use]
    pub fn with_badge(&self, badge: &str) -> Self {
        let mut next = self.clone();
        if !next.badges.iter().any(|b| b == badge) {
            next.badges.push(badge.to_string());
        }
        next
    }

    #[must_use]
    pub fn with_settings(&self, settings: LearnerSettings) -> Self {
        let mut next = self.clone();
        next.settings = settings;
        next
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn topic() -> TopicId {
        TopicId::new("topic-1")
    }

    #[test]
    fn fresh_learner_has_no_progress_or_badges() {
        let learner = Learner::named("  Mia ").unwrap();
        assert_eq!(learner.id().as_str(), "Mia");
        assert_eq!(learner.display_name(), "Mia");
        assert!(!learner.is_guest());
        assert!(learner.progress().is_empty());
        assert!(learner.badges().is_empty());
        assert_eq!(learner.settings(), LearnerSettings::default());
    }

    #[test]
    fn blank_name_is_rejected_unless_guest() {
        assert_eq!(Learner::named("   "), Err(LearnerError::EmptyName));
        let guest = Learner::guest("");
        assert_eq!(guest.id(), &LearnerId::guest());
        assert_eq!(guest.display_name(), Learner::GUEST_NAME);
        assert!(guest.is_guest());
    }

    #[test]
    fn mastery_keeps_best_score() {
        let learner = Learner::named("Mia").unwrap();
        let once = learner.with_mastery(&topic(), MasteryScore::clamped(67));
        let twice = once.with_mastery(&topic(), MasteryScore::clamped(33));
        assert_eq!(twice.mastery(&topic()).value(), 67);

        let progress = twice.topic_progress(&topic()).unwrap();
        assert_eq!(progress.quiz_scores().get("topic-1").unwrap().value(), 33);
    }

    #[test]
    fn mastery_commit_is_idempotent() {
        let learner = Learner::named("Mia").unwrap();
        let once = learner.with_mastery(&topic(), MasteryScore::clamped(80));
        let twice = once.with_mastery(&topic(), MasteryScore::clamped(80));
        assert_eq!(once, twice);
    }

    #[test]
    fn mastery_for_all_score_pairs_is_the_maximum() {
        let learner = Learner::named("Mia").unwrap();
        for s1 in (-10..=110).step_by(15) {
            for s2 in (-10..=110).step_by(15) {
                let result = learner
                    .with_mastery(&topic(), MasteryScore::clamped(s1))
                    .with_mastery(&topic(), MasteryScore::clamped(s2));
                let expected = s1.max(s2).clamp(0, 100);
                assert_eq!(i64::from(result.mastery(&topic()).value()), expected);
            }
        }
    }

    #[test]
    fn completed_lessons_are_a_set() {
        let lesson = LessonId::new("lesson-1");
        let learner = Learner::named("Mia")
            .unwrap()
            .with_completed_lesson(&topic(), &lesson)
            .with_completed_lesson(&topic(), &lesson);
        let progress = learner.topic_progress(&topic()).unwrap();
        assert_eq!(progress.completed_lessons().len(), 1);
        assert_eq!(progress.mastery_score(), MasteryScore::ZERO);
    }

    #[test]
    fn badges_append_once_and_good_start_is_display_only() {
        let learner = Learner::named("Mia").unwrap();
        assert!(learner.display_badges().is_empty());

        let learner = learner
            .with_badge("💎 Decimal Dynamo")
            .with_badge("💎 Decimal Dynamo")
            .with_mastery(&topic(), MasteryScore::clamped(10));
        assert_eq!(learner.badges(), ["💎 Decimal Dynamo".to_string()]);
        assert_eq!(
            learner.display_badges(),
            vec!["💎 Decimal Dynamo".to_string(), Learner::GOOD_START_BADGE.to_string()]
        );
    }

    #[test]
    fn record_round_trips_through_json() {
        let learner = Learner::named("Mia")
            .unwrap()
            .with_mastery(&topic(), MasteryScore::clamped(67))
            .with_badge("🧙 Math Wizard");
        let json = serde_json::to_string(&learner).unwrap();
        let back: Learner = serde_json::from_str(&json).unwrap();
        assert_eq!(back, learner);
    }
}
