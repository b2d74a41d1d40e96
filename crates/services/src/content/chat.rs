use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use academy_core::Clock;
use academy_core::model::{
    Difficulty, Lesson, LessonId, ProviderSettings, ProviderSettingsDraft, ProviderSettingsError,
    Question, Topic,
};

use super::prompts::{grade_prompt, lesson_prompt, quiz_prompt};
use super::wire::{GradeDto, LessonDto, QuizDto};
use super::{AudioPayload, ContentProvider, GradeVerdict};
use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SPEECH_MODEL: &str = "gpt-4o-mini-tts";
const DEFAULT_SPEECH_VOICE: &str = "alloy";
const SPEECH_FORMAT: &str = "mp3";

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub chat_model: String,
    pub speech_model: String,
    pub speech_voice: String,
}

impl ProviderConfig {
    /// Read `ACADEMY_AI_*` / `ACADEMY_TTS_*` from the environment.
    ///
    /// Returns `Ok(None)` when no API key is set.
    ///
    /// # Errors
    ///
    /// Returns `ProviderSettingsError` if `ACADEMY_AI_BASE_URL` is not a URL.
    pub fn from_env() -> Result<Option<Self>, ProviderSettingsError> {
        let settings = ProviderSettingsDraft {
            api_key: env::var("ACADEMY_AI_API_KEY").ok(),
            base_url: env::var("ACADEMY_AI_BASE_URL").ok(),
            chat_model: env::var("ACADEMY_AI_MODEL").ok(),
            speech_model: env::var("ACADEMY_TTS_MODEL").ok(),
            speech_voice: env::var("ACADEMY_TTS_VOICE").ok(),
        }
        .validate()?;
        Ok(Self::from_settings(&settings))
    }

    /// Fill defaults around validated settings. `None` without an API key.
    #[must_use]
    pub fn from_settings(settings: &ProviderSettings) -> Option<Self> {
        let api_key = settings.api_key()?.to_string();
        Some(Self {
            base_url: settings.base_url().unwrap_or(DEFAULT_BASE_URL).to_string(),
            api_key,
            chat_model: settings.chat_model().unwrap_or(DEFAULT_CHAT_MODEL).to_string(),
            speech_model: settings
                .speech_model()
                .unwrap_or(DEFAULT_SPEECH_MODEL)
                .to_string(),
            speech_voice: settings
                .speech_voice()
                .unwrap_or(DEFAULT_SPEECH_VOICE)
                .to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Content provider backed by an OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct ChatContentProvider {
    client: Client,
    config: Option<ProviderConfig>,
    clock: Clock,
}

impl ChatContentProvider {
    #[must_use]
    pub fn new(config: Option<ProviderConfig>, clock: Clock) -> Self {
        Self {
            client: Client::new(),
            config,
            clock,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    fn config(&self) -> Result<&ProviderConfig, ProviderError> {
        self.config.as_ref().ok_or(ProviderError::Disabled)
    }

    async fn complete_json<T: DeserializeOwned>(&self, prompt: String) -> Result<T, ProviderError> {
        let config = self.config()?;
        let payload = ChatRequest {
            model: config.chat_model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.2,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(config.endpoint("chat/completions"))
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        serde_json::from_str(content.trim()).map_err(|err| ProviderError::Malformed(err.to_string()))
    }

    async fn request_speech(&self, text: &str) -> Result<AudioPayload, ProviderError> {
        let config = self.config()?;
        let payload = SpeechRequest {
            model: &config.speech_model,
            voice: &config.speech_voice,
            input: text,
            response_format: SPEECH_FORMAT,
        };

        let response = self
            .client
            .post(config.endpoint("audio/speech"))
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(AudioPayload {
            bytes: bytes.to_vec(),
            format: SPEECH_FORMAT.to_string(),
        })
    }
}

#[async_trait]
impl ContentProvider for ChatContentProvider {
    async fn generate_lesson(&self, topic: &Topic) -> Result<Lesson, ProviderError> {
        let dto: LessonDto = self.complete_json(lesson_prompt(topic)).await?;
        let id = LessonId::stamped(self.clock.now_millis());
        dto.into_lesson(id, topic.id().clone())
    }

    async fn generate_quiz(
        &self,
        topic: &Topic,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, ProviderError> {
        let dto: QuizDto = self.complete_json(quiz_prompt(topic, difficulty)).await?;
        dto.into_questions()
    }

    async fn grade_open_response(
        &self,
        question: &Question,
        answer: &str,
    ) -> Result<GradeVerdict, ProviderError> {
        let dto: GradeDto = self.complete_json(grade_prompt(question, answer)).await?;
        Ok(GradeVerdict {
            is_correct: dto.is_correct,
            feedback: dto.feedback,
        })
    }

    async fn synthesize_speech(&self, text: &str) -> Option<AudioPayload> {
        match self.request_speech(text).await {
            Ok(audio) => Some(audio),
            Err(err) => {
                tracing::warn!(error = %err, "speech synthesis failed");
                None
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_core::curriculum::curriculum;
    use academy_core::time::fixed_clock;

    #[test]
    fn config_needs_a_key_and_fills_defaults() {
        let none = ProviderSettingsDraft::new().validate().unwrap();
        assert!(ProviderConfig::from_settings(&none).is_none());

        let settings = ProviderSettingsDraft {
            api_key: Some("sk-test".into()),
            base_url: Some("http://localhost:8080/v1/".into()),
            ..ProviderSettingsDraft::new()
        }
        .validate()
        .unwrap();
        let config = ProviderConfig::from_settings(&settings).unwrap();
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.speech_voice, DEFAULT_SPEECH_VOICE);
        assert_eq!(
            config.endpoint("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn disabled_provider_fails_generation_and_returns_no_speech() {
        let provider = ChatContentProvider::new(None, fixed_clock());
        assert!(!provider.enabled());

        let topic = curriculum().remove(0);
        let err = provider.generate_lesson(&topic).await.unwrap_err();
        assert!(matches!(err, ProviderError::Disabled));
        assert!(provider.synthesize_speech("hello").await.is_none());
    }
}
