mod badge;
mod ids;
mod learner;
mod lesson;
mod mastery;
mod provider_settings;
mod question;
mod topic;

pub use badge::Badge;
pub use ids::{LearnerId, LessonId, TopicId};
pub use learner::{Learner, LearnerError, LearnerSettings, TopicProgress};
pub use lesson::{DiagramKind, Lesson, LessonError, Slide, SlideKind};
pub use mastery::{MasteryError, MasteryScore, MasteryTier};
pub use provider_settings::{ProviderSettings, ProviderSettingsDraft, ProviderSettingsError};
pub use question::{Difficulty, Question, QuestionKind};
pub use topic::{Topic, TopicCategory};
