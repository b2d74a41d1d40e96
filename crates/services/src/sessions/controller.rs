use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::watch;

use academy_core::model::{Badge, Difficulty, Learner, Question, QuestionKind, Slide, Topic};

use crate::content::ContentProvider;
use crate::error::{QuizError, SessionError};
use crate::narration::{NarrationPlayer, Narrator};
use crate::progress_store::ProgressStore;
use crate::sessions::advance::{AdvanceDelays, AdvanceTicket, ScheduledAdvance};
use crate::sessions::dashboard::{DashboardEntry, dashboard_for};
use crate::sessions::machine::{
    Effect, SessionEvent, SessionPhase, SessionState, StepContext, transition,
};
use crate::sessions::quiz::{AnswerFeedback, QuizSession, choice_feedback};

/// Tunables for a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub delays: AdvanceDelays,
}

/// Owns the session state and runs the effects of each transition.
///
/// All methods take `&mut self`; the presentation layer drives one
/// controller from a single task.
pub struct SessionController {
    store: ProgressStore,
    provider: Arc<dyn ContentProvider>,
    narrator: Narrator,
    config: SessionConfig,
    state: SessionState,
    learner: Option<Learner>,
    pending_advance: Option<ScheduledAdvance>,
    quiz_serial: u64,
    notice: Option<String>,
    phase_tx: watch::Sender<SessionPhase>,
}

impl SessionController {
    #[must_use]
    pub fn new(
        store: ProgressStore,
        provider: Arc<dyn ContentProvider>,
        player: Arc<dyn NarrationPlayer>,
        config: SessionConfig,
    ) -> Self {
        let (phase_tx, _) = watch::channel(SessionPhase::LoggedOut);
        Self {
            store,
            narrator: Narrator::new(Arc::clone(&provider), player),
            provider,
            config,
            state: SessionState::LoggedOut,
            learner: None,
            pending_advance: None,
            quiz_serial: 0,
            notice: None,
            phase_tx,
        }
    }

    /// Build a controller and sign back in whoever was persisted last.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Progress` if the store cannot be read.
    pub async fn resume(
        store: ProgressStore,
        provider: Arc<dyn ContentProvider>,
        player: Arc<dyn NarrationPlayer>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let mut controller = Self::new(store, provider, player, config);
        if let Some(learner) = controller.store.load().await? {
            tracing::info!(learner = %learner.id(), "resuming persisted learner");
            controller.learner = Some(learner);
            controller.dispatch(SessionEvent::SignedIn).await?;
        }
        Ok(controller)
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn learner(&self) -> Option<&Learner> {
        self.learner.as_ref()
    }

    /// Observe phase changes, including the loading phases.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.phase_tx.subscribe()
    }

    #[must_use]
    pub fn pending_advance(&self) -> Option<ScheduledAdvance> {
        self.pending_advance
    }

    #[must_use]
    pub fn is_narrating(&self) -> bool {
        self.narrator.is_active()
    }

    /// The most recent user-facing notice, cleared on read.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` without a learner.
    pub fn dashboard(&self) -> Result<Vec<DashboardEntry>, SessionError> {
        Ok(dashboard_for(self.require_learner()?))
    }

    /// One-based slide number and slide count while in a lesson.
    #[must_use]
    pub fn lesson_progress(&self) -> Option<(usize, usize)> {
        match &self.state {
            SessionState::LessonActive {
                lesson,
                slide_index,
                ..
            } => Some((slide_index + 1, lesson.len())),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_slide(&self) -> Option<&Slide> {
        self.state.current_slide()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            SessionState::QuizActive { quiz, .. } => quiz.current_question(),
            _ => None,
        }
    }

    // ─── Operations ────────────────────────────────────────────────────────────

    /// Sign in by name, or as the shared guest.
    ///
    /// The persisted learner is reused when the identity matches, then the
    /// shelved learner from the last sign-out; otherwise a fresh record is made.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` when someone is already signed in,
    /// `SessionError::Learner` for a blank name, and `SessionError::Progress`
    /// on storage failure.
    pub async fn login(&mut self, display_name: &str, is_guest: bool) -> Result<&Learner, SessionError> {
        if self.state != SessionState::LoggedOut {
            return Err(SessionError::InvalidEvent {
                state: self.state.describe(),
                event: SessionEvent::SignedIn.describe(),
            });
        }
        let id = Learner::identity_for_login(display_name, is_guest)?;

        let persisted = self.store.load().await?.filter(|learner| learner.id() == &id);
        let learner = match persisted {
            Some(learner) => learner,
            None => match self.store.restore(&id).await? {
                Some(learner) => learner,
                None if is_guest => Learner::guest(display_name),
                None => Learner::named(display_name)?,
            },
        };
        self.store.save(&learner).await?;
        tracing::info!(learner = %learner.id(), guest = is_guest, "signed in");

        self.learner = Some(learner);
        self.dispatch(SessionEvent::SignedIn).await?;
        self.require_learner()
    }

    /// Open a topic: generate its lesson and show the first slide.
    ///
    /// A generation failure is not an error; the session returns to the
    /// dashboard and a notice is left for `take_notice`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside the dashboard.
    pub async fn select_topic(&mut self, topic: Topic) -> Result<(), SessionError> {
        self.require_learner()?;
        self.dispatch(SessionEvent::TopicSelected(topic)).await
    }

    /// Next slide; past the last slide the lesson is recorded and the quiz loads.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside a lesson.
    pub async fn advance(&mut self) -> Result<(), SessionError> {
        self.require_learner()?;
        self.dispatch(SessionEvent::Advance).await
    }

    /// Judge `answer` for the current question and schedule the auto-advance.
    ///
    /// Multiple-choice answers are checked locally; open responses go to the
    /// provider. A grading failure leaves the question unanswered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside a quiz,
    /// `QuizError::FeedbackPending` while feedback is showing, and
    /// `SessionError::Provider` when grading fails.
    pub async fn submit_answer(&mut self, answer: &str) -> Result<AnswerFeedback, SessionError> {
        let question = match &self.state {
            SessionState::QuizActive { quiz, .. } => {
                if quiz.feedback().is_some() {
                    return Err(QuizError::FeedbackPending.into());
                }
                quiz.current_question().ok_or(QuizError::Finished)?.clone()
            }
            other => {
                return Err(SessionError::InvalidEvent {
                    state: other.describe(),
                    event: "submit an answer",
                });
            }
        };

        let (correct, message) = match &question.kind {
            QuestionKind::MultipleChoice { correct_answer, .. } => {
                let correct = question.check_choice(answer) == Some(true);
                (correct, choice_feedback(correct_answer, &question.explanation, correct))
            }
            QuestionKind::OpenResponse { .. } => {
                let verdict = self.provider.grade_open_response(&question, answer).await?;
                (verdict.is_correct, verdict.feedback)
            }
        };
        tracing::debug!(question = %question.id, correct, "answer judged");

        self.dispatch(SessionEvent::AnswerJudged { correct, message }).await?;
        match &self.state {
            SessionState::QuizActive { quiz, .. } => {
                Ok(quiz.feedback().cloned().ok_or(QuizError::Finished)?)
            }
            _ => Err(QuizError::Finished.into()),
        }
    }

    /// Deliver a scheduled advance. Tickets that no longer match the pending
    /// advance are ignored and `false` is returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Progress` if committing the final score fails.
    pub async fn fire_advance(&mut self, ticket: AdvanceTicket) -> Result<bool, SessionError> {
        if self.pending_advance.map(ScheduledAdvance::ticket) != Some(ticket) {
            tracing::debug!(?ticket, "ignoring stale advance");
            return Ok(false);
        }
        self.pending_advance = None;
        self.dispatch(SessionEvent::AdvanceDue(ticket)).await?;
        Ok(true)
    }

    /// Sleep until the pending advance is due, then fire it.
    /// Returns `false` immediately when nothing is scheduled.
    ///
    /// # Errors
    ///
    /// See [`SessionController::fire_advance`].
    pub async fn wait_for_advance(&mut self) -> Result<bool, SessionError> {
        let Some(scheduled) = self.pending_advance else {
            return Ok(false);
        };
        tokio::time::sleep_until(scheduled.deadline()).await;
        self.fire_advance(scheduled.ticket()).await
    }

    /// Leave the lesson, quiz, or results screen. An unfinished quiz is
    /// abandoned without recording a score.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` while content is loading.
    pub async fn return_to_dashboard(&mut self) -> Result<(), SessionError> {
        self.require_learner()?;
        self.dispatch(SessionEvent::ReturnToDashboard).await
    }

    /// Sign out. The learner is shelved for a later login and the active
    /// record is cleared.
    ///
    /// The active record is cleared even when shelving fails.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Progress` on storage failure.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.dispatch(SessionEvent::SignedOut).await?;
        let shelved = match self.learner.take() {
            Some(learner) => {
                let shelved = self.store.shelve(&learner).await;
                if let Err(err) = &shelved {
                    tracing::warn!(learner = %learner.id(), error = %err, "could not shelve learner");
                }
                tracing::info!(learner = %learner.id(), "signed out");
                shelved
            }
            None => Ok(()),
        };
        self.store.clear().await?;
        Ok(shelved?)
    }

    /// Stop narration if it is playing, otherwise replay the current slide.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside a lesson.
    pub async fn toggle_narration(&mut self) -> Result<(), SessionError> {
        let playing = self.narrator.is_active();
        self.dispatch(SessionEvent::ToggleNarration { playing }).await
    }

    /// Persist the learner's voice preference. Turning it off stops narration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` or `SessionError::Progress`.
    pub async fn set_voice_enabled(&mut self, enabled: bool) -> Result<(), SessionError> {
        let learner = self.require_learner()?;
        let mut settings = learner.settings();
        settings.voice_enabled = enabled;
        let updated = learner.with_settings(settings);
        self.store.save(&updated).await?;
        self.learner = Some(updated);
        if !enabled {
            self.narrator.stop();
        }
        Ok(())
    }

    // ─── Internals ─────────────────────────────────────────────────────────────

    fn require_learner(&self) -> Result<&Learner, SessionError> {
        self.learner.as_ref().ok_or(SessionError::NotSignedIn)
    }

    fn step_context(&self) -> StepContext {
        StepContext {
            voice_enabled: self
                .learner
                .as_ref()
                .is_some_and(|learner| learner.settings().voice_enabled),
            difficulty: self.config.difficulty,
            delays: self.config.delays,
        }
    }

    /// Apply `event` and every follow-up event its effects produce.
    async fn dispatch(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let step = transition(&self.state, event, &self.step_context())?;
            self.set_state(step.state);
            for effect in step.effects {
                if let Some(next) = self.run_effect(effect).await? {
                    queue.push_back(next);
                }
            }
        }
        Ok(())
    }

    fn set_state(&mut self, next: SessionState) {
        let (from, to) = (self.state.phase(), next.phase());
        self.state = next;
        if from != to {
            tracing::debug!(?from, ?to, "session phase changed");
            self.phase_tx.send_replace(to);
        }
    }

    async fn run_effect(&mut self, effect: Effect) -> Result<Option<SessionEvent>, SessionError> {
        match effect {
            Effect::GenerateLesson(topic) => match self.provider.generate_lesson(&topic).await {
                Ok(lesson) => Ok(Some(SessionEvent::LessonReady(lesson))),
                Err(err) => {
                    tracing::warn!(topic = %topic.id(), error = %err, "lesson generation failed");
                    Ok(Some(SessionEvent::LessonFailed))
                }
            },
            Effect::GenerateQuiz { topic, difficulty } => {
                let generated = self.provider.generate_quiz(&topic, difficulty).await;
                let quiz = generated
                    .map_err(|err| err.to_string())
                    .and_then(|questions| {
                        self.quiz_serial += 1;
                        QuizSession::new(self.quiz_serial, questions).map_err(|err| err.to_string())
                    });
                match quiz {
                    Ok(quiz) => Ok(Some(SessionEvent::QuizReady(quiz))),
                    Err(err) => {
                        tracing::warn!(topic = %topic.id(), %difficulty, error = %err, "quiz generation failed");
                        Ok(Some(SessionEvent::QuizFailed))
                    }
                }
            }
            Effect::Narrate(text) => {
                self.narrator.narrate(&text);
                Ok(None)
            }
            Effect::StopNarration => {
                self.narrator.stop();
                Ok(None)
            }
            Effect::ScheduleAdvance { ticket, delay } => {
                self.pending_advance = Some(ScheduledAdvance::after(ticket, delay));
                Ok(None)
            }
            Effect::CancelAdvance => {
                self.pending_advance = None;
                Ok(None)
            }
            Effect::RecordLesson { topic_id, lesson_id } => {
                let learner = self
                    .require_learner()?
                    .with_badge(Badge::for_lesson().label());
                // The quiz still loads; the record rides along with the next save.
                let updated = match self
                    .store
                    .record_lesson_completed(&learner, &topic_id, &lesson_id)
                    .await
                {
                    Ok(updated) => updated,
                    Err(err) => {
                        tracing::warn!(topic = %topic_id, lesson = %lesson_id, error = %err, "lesson completion not persisted");
                        learner.with_completed_lesson(&topic_id, &lesson_id)
                    }
                };
                self.learner = Some(updated);
                Ok(None)
            }
            Effect::CommitMastery { topic, score } => {
                let learner = Badge::for_quiz(&topic, score)
                    .into_iter()
                    .fold(self.require_learner()?.clone(), |learner, badge| {
                        learner.with_badge(badge.label())
                    });
                let updated = self.store.commit_mastery(&learner, topic.id(), score).await?;
                self.learner = Some(updated);
                Ok(None)
            }
            Effect::Notify(message) => {
                tracing::info!(notice = %message, "session notice");
                self.notice = Some(message);
                Ok(None)
            }
        }
    }
}
