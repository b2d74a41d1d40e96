use thiserror::Error;
use url::Url;

/// Validated connection settings for the content provider.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ProviderSettings {
    api_key: Option<String>,
    base_url: Option<String>,
    chat_model: Option<String>,
    speech_model: Option<String>,
    speech_voice: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ProviderSettingsDraft {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub chat_model: Option<String>,
    pub speech_model: Option<String>,
    pub speech_voice: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,
}

impl ProviderSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim values, drop blanks, and check the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ProviderSettingsError` if the base URL is present but invalid.
    pub fn validate(self) -> Result<ProviderSettings, ProviderSettingsError> {
        let base_url = normalize_optional(self.base_url);
        if let Some(url) = base_url.as_ref() {
            if Url::parse(url).is_err() {
                return Err(ProviderSettingsError::InvalidBaseUrl);
            }
        }

        Ok(ProviderSettings {
            api_key: normalize_optional(self.api_key),
            base_url,
            chat_model: normalize_optional(self.chat_model),
            speech_model: normalize_optional(self.speech_model),
            speech_voice: normalize_optional(self.speech_voice),
        })
    }
}

impl ProviderSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    #[must_use]
    pub fn chat_model(&self) -> Option<&str> {
        self.chat_model.as_deref()
    }

    #[must_use]
    pub fn speech_model(&self) -> Option<&str> {
        self.speech_model.as_deref()
    }

    #[must_use]
    pub fn speech_voice(&self) -> Option<&str> {
        self.speech_voice.as_deref()
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
