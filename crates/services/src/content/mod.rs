//! Contract for the external content service and its HTTP adapter.

mod chat;
mod prompts;
mod wire;

use async_trait::async_trait;

use academy_core::model::{Difficulty, Lesson, Question, Topic};

use crate::error::ProviderError;

pub use chat::{ChatContentProvider, ProviderConfig};

/// Outcome of grading an open-response answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeVerdict {
    pub is_correct: bool,
    pub feedback: String,
}

/// Encoded speech returned by the provider, handed to a `NarrationPlayer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    /// Container or sample format reported by the provider (e.g. `mp3`).
    pub format: String,
}

/// Generates lessons and quizzes, grades open answers, and synthesizes speech.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Build a lesson with at least one slide.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport or parse failure, or an empty lesson.
    async fn generate_lesson(&self, topic: &Topic) -> Result<Lesson, ProviderError>;

    /// Build at least one typed question at the given difficulty.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport or parse failure, or an empty quiz.
    async fn generate_quiz(
        &self,
        topic: &Topic,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, ProviderError>;

    /// Judge a free-text answer against the question's model answer.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport or parse failure.
    async fn grade_open_response(
        &self,
        question: &Question,
        answer: &str,
    ) -> Result<GradeVerdict, ProviderError>;

    /// Speech for `text`, or `None` when synthesis fails for any reason.
    async fn synthesize_speech(&self, text: &str) -> Option<AudioPayload>;
}
