use academy_core::model::{Difficulty, Question, QuestionKind, Topic};

pub(crate) const QUIZ_LENGTH: usize = 3;

pub(crate) fn lesson_prompt(topic: &Topic) -> String {
    format!(
        r#"Create a 5th-grade math lesson for Texas TEKS topic: {code} - {title}.
Description: {description}.

The lesson should have 4 slides:
1. Introduction/Hook (real world example)
2. Concept Explanation (clear simple terms)
3. Step-by-Step Example
4. Summary

Return a JSON object matching this schema:
{{
  "title": "Fun lesson title",
  "slides": [
    {{
      "id": "slide-1",
      "type": "text | diagram | interactive",
      "content": "Markdown content for slide",
      "narration": "Text specific for speech synthesis that sounds conversational",
      "diagramType": "fraction-circles | number-line | blocks | none"
    }}
  ]
}}
For diagramType, use 'fraction-circles' if fractions involved, 'number-line' for ordering, or 'blocks' for counting. Otherwise 'none'."#,
        code = topic.code(),
        title = topic.title(),
        description = topic.description(),
    )
}

pub(crate) fn quiz_prompt(topic: &Topic, difficulty: Difficulty) -> String {
    format!(
        r#"Create {QUIZ_LENGTH} {difficulty} difficulty practice questions for 5th grade math topic {code}: {title}.
Mix Multiple Choice and Open Response.

Return a JSON object matching this schema:
{{
  "questions": [
    {{
      "id": "q1",
      "type": "multiple-choice | open-response",
      "text": "Question text",
      "options": ["only for multiple-choice"],
      "correctAnswer": "exact text of the correct option (multiple-choice only)",
      "modelAnswer": "a model answer (open-response only)",
      "explanation": "short explanation of the answer"
    }}
  ]
}}"#,
        code = topic.code(),
        title = topic.title(),
    )
}

pub(crate) fn grade_prompt(question: &Question, answer: &str) -> String {
    let model_answer = match &question.kind {
        QuestionKind::OpenResponse { model_answer } => model_answer.as_str(),
        QuestionKind::MultipleChoice { correct_answer, .. } => correct_answer.as_str(),
    };
    format!(
        r#"You are a 5th grade math teacher. Grade this answer.
Question: {question}
Model Answer: {model_answer}
Student Answer: {answer}

Is the student correct? Provide short, encouraging feedback.
Return a JSON object: {{"isCorrect": true or false, "feedback": "..."}}"#,
        question = question.prompt,
    )
}
