use std::time::Duration;

use tokio::time::Instant;

/// Identifies the question whose feedback is showing.
///
/// A ticket only matches while the same quiz instance is still on the same
/// question, so an advance that fires after the learner moved on is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvanceTicket {
    quiz_serial: u64,
    question_index: usize,
}

impl AdvanceTicket {
    #[must_use]
    pub(crate) fn new(quiz_serial: u64, question_index: usize) -> Self {
        Self {
            quiz_serial,
            question_index,
        }
    }

    #[must_use]
    pub fn question_index(self) -> usize {
        self.question_index
    }
}

/// How long answer feedback stays on screen before the quiz moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceDelays {
    pub correct: Duration,
    /// Longer, so the learner can read the explanation.
    pub incorrect: Duration,
}

impl AdvanceDelays {
    #[must_use]
    pub fn for_answer(self, correct: bool) -> Duration {
        if correct { self.correct } else { self.incorrect }
    }
}

impl Default for AdvanceDelays {
    fn default() -> Self {
        Self {
            correct: Duration::from_millis(1500),
            incorrect: Duration::from_millis(4000),
        }
    }
}

/// A pending auto-advance owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAdvance {
    ticket: AdvanceTicket,
    deadline: Instant,
}

impl ScheduledAdvance {
    #[must_use]
    pub(crate) fn after(ticket: AdvanceTicket, delay: Duration) -> Self {
        Self {
            ticket,
            deadline: Instant::now() + delay,
        }
    }

    #[must_use]
    pub fn ticket(self) -> AdvanceTicket {
        self.ticket
    }

    #[must_use]
    pub fn deadline(self) -> Instant {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_answers_linger_longer() {
        let delays = AdvanceDelays::default();
        assert_eq!(delays.for_answer(true), Duration::from_millis(1500));
        assert_eq!(delays.for_answer(false), Duration::from_millis(4000));
    }

    #[test]
    fn tickets_differ_by_quiz_and_question() {
        let a = AdvanceTicket::new(1, 0);
        assert_eq!(a, AdvanceTicket::new(1, 0));
        assert_ne!(a, AdvanceTicket::new(1, 1));
        assert_ne!(a, AdvanceTicket::new(2, 0));
    }
}
