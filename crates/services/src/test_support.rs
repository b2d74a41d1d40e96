//! Scripted collaborators shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use academy_core::model::{
    DiagramKind, Difficulty, Lesson, LessonId, Question, QuestionKind, Slide, SlideKind, Topic,
    TopicId,
};

use storage::repository::{InMemoryRepository, LearnerSlot, LearnerSlotRepository, StorageError};

use crate::content::{AudioPayload, ContentProvider, GradeVerdict};
use crate::error::{NarrationError, ProviderError};
use crate::narration::NarrationPlayer;

pub(crate) fn sample_lesson(topic_id: &TopicId, slides: usize) -> Lesson {
    let slides = (1..=slides)
        .map(|n| Slide {
            id: format!("slide-{n}"),
            kind: SlideKind::Text,
            content: format!("content {n}"),
            narration: Some(format!("narration {n}")),
            diagram: DiagramKind::None,
        })
        .collect();
    Lesson::new(LessonId::new("lesson-test"), topic_id.clone(), "Test Lesson", slides)
        .expect("sample lesson has slides")
}

pub(crate) fn choice_question(id: &str, correct: &str) -> Question {
    Question {
        id: id.to_string(),
        prompt: format!("prompt {id}"),
        kind: QuestionKind::MultipleChoice {
            options: vec![correct.to_string(), "wrong".to_string()],
            correct_answer: correct.to_string(),
        },
        explanation: "because".to_string(),
    }
}

pub(crate) fn open_question(id: &str) -> Question {
    Question {
        id: id.to_string(),
        prompt: format!("explain {id}"),
        kind: QuestionKind::OpenResponse {
            model_answer: "model".to_string(),
        },
        explanation: String::new(),
    }
}

/// Provider returning canned content and recording how often it was asked.
pub(crate) struct ScriptedProvider {
    slides: usize,
    questions: Vec<Question>,
    fail_lesson: bool,
    fail_quiz: bool,
    grades: Mutex<VecDeque<Option<GradeVerdict>>>,
    lesson_calls: AtomicUsize,
    quiz_calls: AtomicUsize,
    difficulties: Mutex<Vec<Difficulty>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self {
            slides: 2,
            questions: vec![
                choice_question("q1", "4/8"),
                choice_question("q2", "0.5"),
                choice_question("q3", ">"),
            ],
            fail_lesson: false,
            fail_quiz: false,
            grades: Mutex::new(VecDeque::new()),
            lesson_calls: AtomicUsize::new(0),
            quiz_calls: AtomicUsize::new(0),
            difficulties: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_slides(mut self, slides: usize) -> Self {
        self.slides = slides;
        self
    }

    pub(crate) fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    pub(crate) fn failing_lesson(mut self) -> Self {
        self.fail_lesson = true;
        self
    }

    pub(crate) fn failing_quiz(mut self) -> Self {
        self.fail_quiz = true;
        self
    }

    /// Queue grading outcomes; `None` makes that grading call fail.
    pub(crate) fn with_grades(self, grades: Vec<Option<GradeVerdict>>) -> Self {
        *self.grades.lock().unwrap() = grades.into();
        self
    }

    pub(crate) fn lesson_calls(&self) -> usize {
        self.lesson_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn quiz_calls(&self) -> usize {
        self.quiz_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn difficulties(&self) -> Vec<Difficulty> {
        self.difficulties.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    async fn generate_lesson(&self, topic: &Topic) -> Result<Lesson, ProviderError> {
        self.lesson_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lesson {
            return Err(ProviderError::Malformed("scripted lesson failure".into()));
        }
        Ok(sample_lesson(topic.id(), self.slides))
    }

    async fn generate_quiz(
        &self,
        _topic: &Topic,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, ProviderError> {
        self.quiz_calls.fetch_add(1, Ordering::SeqCst);
        self.difficulties.lock().unwrap().push(difficulty);
        if self.fail_quiz {
            return Err(ProviderError::Malformed("scripted quiz failure".into()));
        }
        Ok(self.questions.clone())
    }

    async fn grade_open_response(
        &self,
        _question: &Question,
        _answer: &str,
    ) -> Result<GradeVerdict, ProviderError> {
        let next = self.grades.lock().unwrap().pop_front();
        match next {
            Some(Some(verdict)) => Ok(verdict),
            Some(None) => Err(ProviderError::EmptyResponse),
            None => Ok(GradeVerdict {
                is_correct: true,
                feedback: "Great reasoning!".into(),
            }),
        }
    }

    async fn synthesize_speech(&self, text: &str) -> Option<AudioPayload> {
        Some(AudioPayload {
            bytes: text.as_bytes().to_vec(),
            format: "text".into(),
        })
    }
}

/// Player that "plays" for a fixed duration and records what finished.
pub(crate) struct RecordingPlayer {
    duration: Duration,
    fail: bool,
    finished: Mutex<Vec<String>>,
    stops: AtomicUsize,
}

impl RecordingPlayer {
    pub(crate) fn with_duration(duration: Duration) -> Self {
        Self {
            duration,
            fail: false,
            finished: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_duration(Duration::ZERO)
        }
    }

    pub(crate) fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub(crate) fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrationPlayer for RecordingPlayer {
    async fn play(&self, audio: AudioPayload) -> Result<(), NarrationError> {
        if self.fail {
            return Err(NarrationError::Playback("scripted playback failure".into()));
        }
        tokio::time::sleep(self.duration).await;
        let text = String::from_utf8_lossy(&audio.bytes).into_owned();
        self.finished.lock().unwrap().push(text);
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Slot repository whose writes can be switched to fail. Deletes always work.
#[derive(Clone, Default)]
pub(crate) struct BrokenWrites {
    inner: InMemoryRepository,
    failing: std::sync::Arc<AtomicBool>,
}

impl BrokenWrites {
    pub(crate) fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LearnerSlotRepository for BrokenWrites {
    async fn read_slot(&self, slot: LearnerSlot) -> Result<Option<String>, StorageError> {
        self.inner.read_slot(slot).await
    }

    async fn write_slot(&self, slot: LearnerSlot, payload: &str) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.write_slot(slot, payload).await
    }

    async fn delete_slot(&self, slot: LearnerSlot) -> Result<(), StorageError> {
        self.inner.delete_slot(slot).await
    }
}
