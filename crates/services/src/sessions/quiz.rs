use academy_core::model::{MasteryScore, Question};

use crate::error::QuizError;
use crate::sessions::advance::AdvanceTicket;

/// Feedback shown after an answer until the quiz advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub message: String,
}

/// Where the quiz went after its feedback window closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizProgress {
    NextQuestion,
    Finished { correct: usize, total: usize },
}

/// One attempt at a generated quiz.
///
/// `serial` is unique per attempt so advance tickets from an earlier quiz
/// never match a later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    serial: u64,
    questions: Vec<Question>,
    current: usize,
    correct: usize,
    feedback: Option<AnswerFeedback>,
}

impl QuizSession {
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` when `questions` is empty.
    pub fn new(serial: u64, questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self {
            serial,
            questions,
            current: 0,
            correct: 0,
            feedback: None,
        })
    }

    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Zero-based index of the question on screen.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn ticket(&self) -> AdvanceTicket {
        AdvanceTicket::new(self.serial, self.current)
    }

    /// Record the judged answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::FeedbackPending` if the question was already
    /// answered and `QuizError::Finished` past the last question.
    pub fn record_answer(&mut self, correct: bool, message: String) -> Result<&AnswerFeedback, QuizError> {
        if self.feedback.is_some() {
            return Err(QuizError::FeedbackPending);
        }
        if self.current >= self.questions.len() {
            return Err(QuizError::Finished);
        }
        if correct {
            self.correct += 1;
        }
        Ok(self.feedback.insert(AnswerFeedback { correct, message }))
    }

    /// Close the feedback window and move on.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Finished` if there is no feedback to advance past.
    pub fn advance(&mut self) -> Result<QuizProgress, QuizError> {
        if self.feedback.take().is_none() {
            return Err(QuizError::Finished);
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            return Ok(QuizProgress::NextQuestion);
        }
        Ok(QuizProgress::Finished {
            correct: self.correct,
            total: self.questions.len(),
        })
    }

    /// Final score of a finished attempt.
    ///
    /// # Errors
    ///
    /// Propagates `MasteryError` for inconsistent counts.
    pub fn score(correct: usize, total: usize) -> Result<MasteryScore, QuizError> {
        Ok(MasteryScore::from_quiz(correct, total)?)
    }
}

/// Feedback text for a locally checked multiple-choice answer.
#[must_use]
pub fn choice_feedback(correct_answer: &str, explanation: &str, correct: bool) -> String {
    if correct {
        return "Awesome job!".to_string();
    }
    let explanation = explanation.trim();
    if explanation.is_empty() {
        format!("Not quite. The correct answer was {correct_answer}.")
    } else {
        format!("Not quite. The correct answer was {correct_answer}. {explanation}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::choice_question;

    fn quiz() -> QuizSession {
        QuizSession::new(
            7,
            vec![choice_question("q1", "a"), choice_question("q2", "b")],
        )
        .unwrap()
    }

    #[test]
    fn empty_quiz_is_rejected() {
        assert_eq!(QuizSession::new(1, Vec::new()), Err(QuizError::NoQuestions));
    }

    #[test]
    fn answering_twice_without_advancing_is_rejected() {
        let mut quiz = quiz();
        quiz.record_answer(true, "yes".into()).unwrap();
        assert_eq!(
            quiz.record_answer(true, "again".into()),
            Err(QuizError::FeedbackPending)
        );
        assert_eq!(quiz.correct_count(), 1);
    }

    #[test]
    fn advance_walks_to_the_end() {
        let mut quiz = quiz();
        let first = quiz.ticket();
        quiz.record_answer(true, "yes".into()).unwrap();
        assert_eq!(quiz.advance(), Ok(QuizProgress::NextQuestion));
        assert_ne!(quiz.ticket(), first);
        assert!(quiz.feedback().is_none());

        quiz.record_answer(false, "no".into()).unwrap();
        assert_eq!(
            quiz.advance(),
            Ok(QuizProgress::Finished { correct: 1, total: 2 })
        );
    }

    #[test]
    fn advance_without_feedback_is_an_error() {
        let mut quiz = quiz();
        assert_eq!(quiz.advance(), Err(QuizError::Finished));
    }

    #[test]
    fn wrong_choice_feedback_names_the_answer() {
        assert_eq!(choice_feedback("4/8", "because", true), "Awesome job!");
        assert_eq!(
            choice_feedback("4/8", "because", false),
            "Not quite. The correct answer was 4/8. because"
        );
        assert_eq!(
            choice_feedback("0.5", "  ", false),
            "Not quite. The correct answer was 0.5."
        );
    }
}
