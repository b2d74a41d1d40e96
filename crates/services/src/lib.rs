#![forbid(unsafe_code)]

pub mod app_services;
pub mod content;
pub mod error;
pub mod narration;
pub mod progress_store;
pub mod sessions;

#[cfg(test)]
mod test_support;

pub use academy_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use content::{AudioPayload, ChatContentProvider, ContentProvider, GradeVerdict, ProviderConfig};
pub use error::{
    AppServicesError, NarrationError, ProgressStoreError, ProviderError, QuizError, SessionError,
};
pub use narration::{MutedPlayer, NarrationPlayer, Narrator};
pub use progress_store::ProgressStore;

pub use sessions::{
    AdvanceDelays, AdvanceTicket, AnswerFeedback, DashboardEntry, SessionConfig, SessionController,
    SessionPhase, SessionState,
};
