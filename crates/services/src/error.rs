//! Shared error types for the services crate.

use thiserror::Error;

use academy_core::model::{LearnerError, MasteryError, ProviderSettingsError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Failures of the content provider (generation, grading, transport).
///
/// Always recoverable: loading failures send the learner back to the
/// dashboard, grading failures are returned to the caller of submit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("content provider is not configured")]
    Disabled,
    #[error("content provider returned an empty response")]
    EmptyResponse,
    #[error("content provider request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("content provider returned malformed content: {0}")]
    Malformed(String),
    #[error("generated lesson has no slides")]
    EmptyLesson,
    #[error("generated quiz has no questions")]
    EmptyQuiz,
}

/// Audio playback failures. Logged by the narrator, never surfaced to the
/// lesson flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NarrationError {
    #[error("audio playback failed: {0}")]
    Playback(String),
}

/// Errors emitted by `ProgressStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressStoreError {
    #[error("learner record could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,
    #[error("quiz already finished")]
    Finished,
    #[error("answer feedback is still showing")]
    FeedbackPending,
    #[error(transparent)]
    Mastery(#[from] MasteryError),
}

/// Errors emitted by the session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no learner is signed in")]
    NotSignedIn,
    #[error("cannot {event} while {state}")]
    InvalidEvent {
        state: &'static str,
        event: &'static str,
    },
    #[error(transparent)]
    Learner(#[from] LearnerError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Progress(#[from] ProgressStoreError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    ProviderSettings(#[from] ProviderSettingsError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
