use std::fmt;

/// Difficulty tier requested from the quiz generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        correct_answer: String,
    },
    /// Graded by the provider against `model_answer`.
    OpenResponse { model_answer: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub explanation: String,
}

impl Question {
    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::MultipleChoice { .. })
    }

    /// Exact, case- and whitespace-sensitive comparison against the recorded
    /// answer. Returns `None` for open-response questions.
    #[must_use]
    pub fn check_choice(&self, answer: &str) -> Option<bool> {
        match &self.kind {
            QuestionKind::MultipleChoice { correct_answer, .. } => Some(answer == correct_answer),
            QuestionKind::OpenResponse { .. } => None,
        }
    }
}
