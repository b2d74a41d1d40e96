//! Pure session transitions.
//!
//! `transition` never performs I/O. It returns the next state together with
//! the effects the controller must run, so every flow can be tested without a
//! provider, a player, or a timer.

use std::time::Duration;

use academy_core::model::{Difficulty, Lesson, LessonId, MasteryScore, Slide, Topic, TopicId};

use crate::error::SessionError;
use crate::sessions::advance::{AdvanceDelays, AdvanceTicket};
use crate::sessions::quiz::{QuizProgress, QuizSession};

pub const LESSON_FAILED_NOTICE: &str =
    "Oops! Sparky couldn't fetch the lesson. Check your internet or API key.";
pub const QUIZ_FAILED_NOTICE: &str =
    "Oops! Sparky couldn't build your quiz. Check your internet or API key.";

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Coarse phase of the session, published to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    LoggedOut,
    Dashboard,
    LessonLoading,
    LessonActive,
    QuizLoading,
    QuizActive,
    QuizCompleted,
}

impl SessionPhase {
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, SessionPhase::LessonLoading | SessionPhase::QuizLoading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    Dashboard,
    LessonLoading {
        topic: Topic,
    },
    LessonActive {
        topic: Topic,
        lesson: Lesson,
        slide_index: usize,
    },
    QuizLoading {
        topic: Topic,
        lesson_id: LessonId,
    },
    QuizActive {
        topic: Topic,
        quiz: QuizSession,
    },
    QuizCompleted {
        topic: Topic,
        correct: usize,
        total: usize,
        score: MasteryScore,
    },
}

impl SessionState {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::LoggedOut => SessionPhase::LoggedOut,
            SessionState::Dashboard => SessionPhase::Dashboard,
            SessionState::LessonLoading { .. } => SessionPhase::LessonLoading,
            SessionState::LessonActive { .. } => SessionPhase::LessonActive,
            SessionState::QuizLoading { .. } => SessionPhase::QuizLoading,
            SessionState::QuizActive { .. } => SessionPhase::QuizActive,
            SessionState::QuizCompleted { .. } => SessionPhase::QuizCompleted,
        }
    }

    /// Human phrase used in `SessionError::InvalidEvent`.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            SessionState::LoggedOut => "signed out",
            SessionState::Dashboard => "on the dashboard",
            SessionState::LessonLoading { .. } => "a lesson is loading",
            SessionState::LessonActive { .. } => "in a lesson",
            SessionState::QuizLoading { .. } => "a quiz is loading",
            SessionState::QuizActive { .. } => "in a quiz",
            SessionState::QuizCompleted { .. } => "viewing quiz results",
        }
    }

    #[must_use]
    pub fn topic(&self) -> Option<&Topic> {
        match self {
            SessionState::LessonLoading { topic }
            | SessionState::LessonActive { topic, .. }
            | SessionState::QuizLoading { topic, .. }
            | SessionState::QuizActive { topic, .. }
            | SessionState::QuizCompleted { topic, .. } => Some(topic),
            SessionState::LoggedOut | SessionState::Dashboard => None,
        }
    }

    #[must_use]
    pub fn current_slide(&self) -> Option<&Slide> {
        match self {
            SessionState::LessonActive {
                lesson,
                slide_index,
                ..
            } => lesson.slide(*slide_index),
            _ => None,
        }
    }
}

//
// ─── EVENTS & EFFECTS ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    TopicSelected(Topic),
    LessonReady(Lesson),
    LessonFailed,
    Advance,
    QuizReady(QuizSession),
    QuizFailed,
    AnswerJudged { correct: bool, message: String },
    AdvanceDue(AdvanceTicket),
    ToggleNarration { playing: bool },
    ReturnToDashboard,
    SignedOut,
}

impl SessionEvent {
    /// Human phrase used in `SessionError::InvalidEvent`.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            SessionEvent::SignedIn => "sign in",
            SessionEvent::TopicSelected(_) => "select a topic",
            SessionEvent::LessonReady(_) => "show a lesson",
            SessionEvent::LessonFailed => "report a lesson failure",
            SessionEvent::Advance => "advance",
            SessionEvent::QuizReady(_) => "start a quiz",
            SessionEvent::QuizFailed => "report a quiz failure",
            SessionEvent::AnswerJudged { .. } => "submit an answer",
            SessionEvent::AdvanceDue(_) => "advance the quiz",
            SessionEvent::ToggleNarration { .. } => "toggle narration",
            SessionEvent::ReturnToDashboard => "return to the dashboard",
            SessionEvent::SignedOut => "sign out",
        }
    }
}

/// Side effects requested by a transition, run in order by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    GenerateLesson(Topic),
    GenerateQuiz { topic: Topic, difficulty: Difficulty },
    Narrate(String),
    StopNarration,
    ScheduleAdvance { ticket: AdvanceTicket, delay: Duration },
    CancelAdvance,
    RecordLesson { topic_id: TopicId, lesson_id: LessonId },
    CommitMastery { topic: Topic, score: MasteryScore },
    Notify(String),
}

/// Inputs to a transition that live outside the state itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepContext {
    pub voice_enabled: bool,
    pub difficulty: Difficulty,
    pub delays: AdvanceDelays,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: SessionState,
    pub effects: Vec<Effect>,
}

impl Step {
    fn to(state: SessionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

//
// ─── TRANSITION ────────────────────────────────────────────────────────────────
//

/// Compute the next state for `event`.
///
/// # Errors
///
/// Returns `SessionError::InvalidEvent` for events the current state does not
/// accept, and `SessionError::Quiz` when a quiz rule is violated.
pub fn transition(
    state: &SessionState,
    event: SessionEvent,
    ctx: &StepContext,
) -> Result<Step, SessionError> {
    use SessionEvent as E;
    use SessionState as S;

    let step = match (state, event) {
        (S::LoggedOut, E::SignedIn) => Step::to(S::Dashboard),

        (S::Dashboard, E::TopicSelected(topic)) => {
            Step::to(S::LessonLoading { topic: topic.clone() }).with(Effect::GenerateLesson(topic))
        }

        (S::LessonLoading { topic }, E::LessonReady(lesson)) => {
            let narration = narrate(&lesson, 0, ctx);
            let step = Step::to(S::LessonActive {
                topic: topic.clone(),
                lesson,
                slide_index: 0,
            });
            match narration {
                Some(effect) => step.with(effect),
                None => step,
            }
        }
        (S::LessonLoading { .. }, E::LessonFailed) => {
            Step::to(S::Dashboard).with(Effect::Notify(LESSON_FAILED_NOTICE.to_string()))
        }

        (
            S::LessonActive {
                topic,
                lesson,
                slide_index,
            },
            E::Advance,
        ) => {
            if lesson.is_last(*slide_index) {
                Step::to(S::QuizLoading {
                    topic: topic.clone(),
                    lesson_id: lesson.id().clone(),
                })
                .with(Effect::StopNarration)
                .with(Effect::RecordLesson {
                    topic_id: topic.id().clone(),
                    lesson_id: lesson.id().clone(),
                })
                .with(Effect::GenerateQuiz {
                    topic: topic.clone(),
                    difficulty: ctx.difficulty,
                })
            } else {
                let next = slide_index + 1;
                let mut step = Step::to(S::LessonActive {
                    topic: topic.clone(),
                    lesson: lesson.clone(),
                    slide_index: next,
                })
                .with(Effect::StopNarration);
                if let Some(effect) = narrate(lesson, next, ctx) {
                    step = step.with(effect);
                }
                step
            }
        }
        (
            S::LessonActive {
                lesson,
                slide_index,
                ..
            },
            E::ToggleNarration { playing },
        ) => {
            let step = Step::to(state.clone());
            if playing {
                step.with(Effect::StopNarration)
            } else {
                match narrate(lesson, *slide_index, ctx) {
                    Some(effect) => step.with(effect),
                    None => step,
                }
            }
        }

        (S::QuizLoading { topic, .. }, E::QuizReady(quiz)) => Step::to(S::QuizActive {
            topic: topic.clone(),
            quiz,
        }),
        (S::QuizLoading { .. }, E::QuizFailed) => {
            Step::to(S::Dashboard).with(Effect::Notify(QUIZ_FAILED_NOTICE.to_string()))
        }

        (S::QuizActive { topic, quiz }, E::AnswerJudged { correct, message }) => {
            let mut quiz = quiz.clone();
            quiz.record_answer(correct, message)?;
            let ticket = quiz.ticket();
            Step::to(S::QuizActive {
                topic: topic.clone(),
                quiz,
            })
            .with(Effect::ScheduleAdvance {
                ticket,
                delay: ctx.delays.for_answer(correct),
            })
        }
        (S::QuizActive { topic, quiz }, E::AdvanceDue(ticket)) => {
            if quiz.ticket() != ticket || quiz.feedback().is_none() {
                return Ok(Step::to(state.clone()));
            }
            let mut quiz = quiz.clone();
            match quiz.advance()? {
                QuizProgress::NextQuestion => Step::to(S::QuizActive {
                    topic: topic.clone(),
                    quiz,
                }),
                QuizProgress::Finished { correct, total } => {
                    let score = QuizSession::score(correct, total)?;
                    Step::to(S::QuizCompleted {
                        topic: topic.clone(),
                        correct,
                        total,
                        score,
                    })
                    .with(Effect::CommitMastery {
                        topic: topic.clone(),
                        score,
                    })
                }
            }
        }
        // A ticket that outlived its quiz.
        (_, E::AdvanceDue(_)) => Step::to(state.clone()),

        (
            S::Dashboard | S::LessonActive { .. } | S::QuizActive { .. } | S::QuizCompleted { .. },
            E::ReturnToDashboard,
        ) => Step::to(S::Dashboard)
            .with(Effect::StopNarration)
            .with(Effect::CancelAdvance),

        (_, E::SignedOut) => Step::to(S::LoggedOut)
            .with(Effect::StopNarration)
            .with(Effect::CancelAdvance),

        (state, event) => {
            return Err(SessionError::InvalidEvent {
                state: state.describe(),
                event: event.describe(),
            });
        }
    };
    Ok(step)
}

fn narrate(lesson: &Lesson, index: usize, ctx: &StepContext) -> Option<Effect> {
    if !ctx.voice_enabled {
        return None;
    }
    let text = lesson.slide(index)?.narration_text();
    if text.trim().is_empty() {
        return None;
    }
    Some(Effect::Narrate(text.to_string()))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
