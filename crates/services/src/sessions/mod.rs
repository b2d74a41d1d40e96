mod advance;
mod controller;
mod dashboard;
mod machine;
mod quiz;

// Public API of the session subsystem.
pub use crate::error::{QuizError, SessionError};
pub use advance::{AdvanceDelays, AdvanceTicket, ScheduledAdvance};
pub use controller::{SessionConfig, SessionController};
pub use dashboard::{DashboardEntry, dashboard_for};
pub use machine::{
    Effect, LESSON_FAILED_NOTICE, QUIZ_FAILED_NOTICE, SessionEvent, SessionPhase, SessionState,
    Step, StepContext, transition,
};
pub use quiz::{AnswerFeedback, QuizProgress, QuizSession, choice_feedback};
