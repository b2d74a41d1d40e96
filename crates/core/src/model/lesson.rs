use thiserror::Error;

use crate::model::ids::{LessonId, TopicId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson has no slides")]
    NoSlides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    Text,
    Diagram,
    Interactive,
}

/// Visual aid chosen by the generator; rendered by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiagramKind {
    FractionCircles,
    NumberLine,
    Blocks,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub id: String,
    pub kind: SlideKind,
    pub content: String,
    pub narration: Option<String>,
    pub diagram: DiagramKind,
}

impl Slide {
    /// Text to speak for this slide: the narration if present, else the content.
    #[must_use]
    pub fn narration_text(&self) -> &str {
        match self.narration.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => &self.content,
        }
    }
}

/// Generated lesson. Lives for one lesson + quiz session only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    topic_id: TopicId,
    title: String,
    slides: Vec<Slide>,
}

impl Lesson {
    /// # Errors
    ///
    /// Returns `LessonError::NoSlides` if `slides` is empty.
    pub fn new(
        id: LessonId,
        topic_id: TopicId,
        title: impl Into<String>,
        slides: Vec<Slide>,
    ) -> Result<Self, LessonError> {
        if slides.is_empty() {
            return Err(LessonError::NoSlides);
        }
        Ok(Self {
            id,
            topic_id,
            title: title.into(),
            slides,
        })
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    #[must_use]
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    #[must_use]
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.slides.len()
    }
}
