//! JSON shapes the provider is asked to return, and their conversion into
//! domain values.

use serde::Deserialize;

use academy_core::model::{
    DiagramKind, Lesson, LessonId, Question, QuestionKind, Slide, SlideKind, TopicId,
};

use crate::error::ProviderError;

#[derive(Debug, Deserialize)]
pub(crate) struct LessonDto {
    #[serde(default)]
    title: String,
    #[serde(default)]
    slides: Vec<SlideDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlideDto {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    content: String,
    narration: Option<String>,
    diagram_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizDto {
    #[serde(default)]
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDto {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    text: String,
    options: Option<Vec<String>>,
    correct_answer: Option<String>,
    model_answer: Option<String>,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GradeDto {
    pub is_correct: bool,
    #[serde(default)]
    pub feedback: String,
}

impl LessonDto {
    pub(crate) fn into_lesson(
        self,
        id: LessonId,
        topic_id: TopicId,
    ) -> Result<Lesson, ProviderError> {
        if self.slides.is_empty() {
            return Err(ProviderError::EmptyLesson);
        }
        let slides = self
            .slides
            .into_iter()
            .enumerate()
            .map(|(index, slide)| Slide {
                id: slide.id.unwrap_or_else(|| format!("slide-{}", index + 1)),
                kind: parse_slide_kind(slide.kind.as_deref()),
                content: slide.content,
                narration: slide.narration.filter(|text| !text.trim().is_empty()),
                diagram: parse_diagram(slide.diagram_type.as_deref()),
            })
            .collect();
        Lesson::new(id, topic_id, self.title, slides).map_err(|_| ProviderError::EmptyLesson)
    }
}

impl QuizDto {
    pub(crate) fn into_questions(self) -> Result<Vec<Question>, ProviderError> {
        if self.questions.is_empty() {
            return Err(ProviderError::EmptyQuiz);
        }
        self.questions
            .into_iter()
            .enumerate()
            .map(|(index, dto)| dto.into_question(index))
            .collect()
    }
}

impl QuestionDto {
    fn into_question(self, index: usize) -> Result<Question, ProviderError> {
        let id = self.id.unwrap_or_else(|| format!("q{}", index + 1));
        let kind = match self.kind.as_deref() {
            Some("multiple-choice") => {
                let options = self.options.unwrap_or_default();
                let correct_answer = self.correct_answer.ok_or_else(|| {
                    ProviderError::Malformed(format!("question {id} has no correct answer"))
                })?;
                if options.is_empty() {
                    return Err(ProviderError::Malformed(format!(
                        "question {id} has no options"
                    )));
                }
                QuestionKind::MultipleChoice {
                    options,
                    correct_answer,
                }
            }
            Some("open-response") => QuestionKind::OpenResponse {
                model_answer: self.model_answer.unwrap_or_default(),
            },
            other => {
                return Err(ProviderError::Malformed(format!(
                    "question {id} has unknown type {other:?}"
                )));
            }
        };
        Ok(Question {
            id,
            prompt: self.text,
            kind,
            explanation: self.explanation,
        })
    }
}

fn parse_slide_kind(raw: Option<&str>) -> SlideKind {
    match raw {
        Some("diagram") => SlideKind::Diagram,
        Some("interactive") => SlideKind::Interactive,
        _ => SlideKind::Text,
    }
}

fn parse_diagram(raw: Option<&str>) -> DiagramKind {
    match raw {
        Some("fraction-circles") => DiagramKind::FractionCircles,
        Some("number-line") => DiagramKind::NumberLine,
        Some("blocks") => DiagramKind::Blocks,
        _ => DiagramKind::None,
    }
}
