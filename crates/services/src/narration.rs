use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::content::{AudioPayload, ContentProvider};
use crate::error::NarrationError;

/// Plays synthesized speech.
#[async_trait]
pub trait NarrationPlayer: Send + Sync {
    /// Play `audio`, completing when playback ends.
    ///
    /// # Errors
    ///
    /// Returns `NarrationError` if the audio cannot be decoded or played.
    async fn play(&self, audio: AudioPayload) -> Result<(), NarrationError>;

    /// Halt any playback. Safe to call when idle.
    fn stop(&self);
}

/// Player for environments without audio output; discards every payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct MutedPlayer;

#[async_trait]
impl NarrationPlayer for MutedPlayer {
    async fn play(&self, audio: AudioPayload) -> Result<(), NarrationError> {
        tracing::debug!(bytes = audio.bytes.len(), format = %audio.format, "narration muted");
        Ok(())
    }

    fn stop(&self) {}
}

/// Runs at most one narration request at a time.
///
/// Each request is a spawned task (synthesize, then play). Starting a new
/// request or calling `stop` aborts the previous task and stops the player.
pub struct Narrator {
    provider: Arc<dyn ContentProvider>,
    player: Arc<dyn NarrationPlayer>,
    task: Option<JoinHandle<()>>,
}

impl Narrator {
    #[must_use]
    pub fn new(provider: Arc<dyn ContentProvider>, player: Arc<dyn NarrationPlayer>) -> Self {
        Self {
            provider,
            player,
            task: None,
        }
    }

    /// Cancel any current narration and start speaking `text` in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn narrate(&mut self, text: &str) {
        self.stop();
        if text.trim().is_empty() {
            return;
        }

        let provider = Arc::clone(&self.provider);
        let player = Arc::clone(&self.player);
        let text = text.to_owned();
        self.task = Some(tokio::spawn(async move {
            let Some(audio) = provider.synthesize_speech(&text).await else {
                tracing::debug!("no audio returned for narration");
                return;
            };
            if let Err(err) = player.play(audio).await {
                tracing::warn!(error = %err, "narration playback failed");
            }
        }));
    }

    /// Abort the in-flight request, if any, and silence the player.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.player.stop();
    }

    /// True while a narration request is synthesizing or playing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Narrator {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
