use std::sync::Arc;

use academy_core::model::{Learner, LearnerId, LessonId, MasteryScore, TopicId};
use storage::repository::{LearnerSlot, LearnerSlotRepository};

use crate::error::ProgressStoreError;

/// Durable home of the single signed-in learner record.
///
/// Records are stored whole as JSON. A record that no longer deserializes is
/// treated as absent so a schema change never locks the learner out.
#[derive(Clone)]
pub struct ProgressStore {
    slots: Arc<dyn LearnerSlotRepository>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(slots: Arc<dyn LearnerSlotRepository>) -> Self {
        Self { slots }
    }

    /// Load the signed-in learner, if one was persisted.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError::Storage` if the backend cannot be read.
    /// Corrupt records are logged and reported as `None`.
    pub async fn load(&self) -> Result<Option<Learner>, ProgressStoreError> {
        self.read(LearnerSlot::Active).await
    }

    /// Replace the persisted learner with `learner`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if encoding or storage fails.
    pub async fn save(&self, learner: &Learner) -> Result<(), ProgressStoreError> {
        self.write(LearnerSlot::Active, learner).await
    }

    /// Remove the persisted learner.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError::Storage` if the backend cannot be written.
    pub async fn clear(&self) -> Result<(), ProgressStoreError> {
        self.slots.delete_slot(LearnerSlot::Active).await?;
        Ok(())
    }

    /// Raise the learner's mastery on `topic_id` to at least `score` and persist.
    ///
    /// The returned learner depends only on the arguments; the write is a side
    /// effect that happens before returning.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persisting the updated record fails.
    pub async fn commit_mastery(
        &self,
        learner: &Learner,
        topic_id: &TopicId,
        score: MasteryScore,
    ) -> Result<Learner, ProgressStoreError> {
        let updated = learner.with_mastery(topic_id, score);
        self.save(&updated).await?;
        tracing::info!(
            learner = %updated.id(),
            topic = %topic_id,
            score = score.value(),
            mastery = updated.mastery(topic_id).value(),
            "committed mastery"
        );
        Ok(updated)
    }

    /// Mark `lesson_id` as completed for `topic_id` and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if persisting the updated record fails.
    pub async fn record_lesson_completed(
        &self,
        learner: &Learner,
        topic_id: &TopicId,
        lesson_id: &LessonId,
    ) -> Result<Learner, ProgressStoreError> {
        let updated = learner.with_completed_lesson(topic_id, lesson_id);
        self.save(&updated).await?;
        Ok(updated)
    }

    /// Keep `learner` in the shelf slot so a later login can restore it.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if encoding or storage fails.
    pub async fn shelve(&self, learner: &Learner) -> Result<(), ProgressStoreError> {
        self.write(LearnerSlot::Shelved, learner).await
    }

    /// Return the shelved learner if it belongs to `id`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError::Storage` if the backend cannot be read.
    pub async fn restore(&self, id: &LearnerId) -> Result<Option<Learner>, ProgressStoreError> {
        let shelved = self.read(LearnerSlot::Shelved).await?;
        Ok(shelved.filter(|learner| learner.id() == id))
    }

    async fn read(&self, slot: LearnerSlot) -> Result<Option<Learner>, ProgressStoreError> {
        let Some(payload) = self.slots.read_slot(slot).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<Learner>(&payload) {
            Ok(learner) => Ok(Some(learner)),
            Err(err) => {
                tracing::warn!(%slot, error = %err, "ignoring corrupt learner record");
                Ok(None)
            }
        }
    }

    async fn write(&self, slot: LearnerSlot, learner: &Learner) -> Result<(), ProgressStoreError> {
        let payload = serde_json::to_string(learner)?;
        self.slots.write_slot(slot, &payload).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn store() -> (ProgressStore, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        (ProgressStore::new(Arc::new(repo.clone())), repo)
    }

    fn topic() -> TopicId {
        TopicId::new("topic-1")
    }

    #[tokio::test]
    async fn load_returns_none_when_empty() {
        let (store, _) = store();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_record_is_treated_as_absent() {
        let (store, repo) = store();
        repo.write_slot(LearnerSlot::Active, "{not json").await.unwrap();
        assert!(store.load().await.unwrap().is_none());

        repo.write_slot(LearnerSlot::Active, r#"{"id":"Mia"}"#).await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_clear() {
        let (store, _) = store();
        let learner = Learner::named("Mia").unwrap();
        store.save(&learner).await.unwrap();
        store.save(&learner).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(learner));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn commit_mastery_never_decreases_and_persists() {
        let (store, _) = store();
        let learner = Learner::named("Mia").unwrap();

        let first = store
            .commit_mastery(&learner, &topic(), MasteryScore::clamped(67))
            .await
            .unwrap();
        let second = store
            .commit_mastery(&first, &topic(), MasteryScore::clamped(33))
            .await
            .unwrap();

        assert_eq!(second.mastery(&topic()).value(), 67);
        assert_eq!(store.load().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn commit_mastery_is_idempotent() {
        let (store, _) = store();
        let learner = Learner::named("Mia").unwrap();
        let score = MasteryScore::clamped(80);

        let once = store.commit_mastery(&learner, &topic(), score).await.unwrap();
        let twice = store.commit_mastery(&once, &topic(), score).await.unwrap();
        assert_eq!(once, twice);
        assert_eq!(store.load().await.unwrap(), Some(once));
    }

    #[tokio::test]
    async fn commit_mastery_return_value_ignores_stored_state() {
        let (store, _) = store();
        let snapshot = Learner::named("Mia").unwrap();
        let stored = snapshot.with_mastery(&topic(), MasteryScore::clamped(90));
        store.save(&stored).await.unwrap();

        let committed = store
            .commit_mastery(&snapshot, &topic(), MasteryScore::clamped(40))
            .await
            .unwrap();
        assert_eq!(committed.mastery(&topic()).value(), 40);
    }

    #[tokio::test]
    async fn restore_only_matches_the_shelved_identity() {
        let (store, _) = store();
        let mia = Learner::named("Mia").unwrap();
        store.shelve(&mia).await.unwrap();

        assert_eq!(store.restore(mia.id()).await.unwrap(), Some(mia));
        assert!(store.restore(&LearnerId::new("Leo")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lesson_completion_is_persisted() {
        let (store, _) = store();
        let learner = Learner::named("Mia").unwrap();
        let lesson = LessonId::new("lesson-1");
        let updated = store
            .record_lesson_completed(&learner, &topic(), &lesson)
            .await
            .unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, updated);
        assert!(
            loaded
                .topic_progress(&topic())
                .unwrap()
                .completed_lessons()
                .contains(&lesson)
        );
    }
}
