use std::sync::Arc;

use storage::repository::Storage;

use crate::content::{ChatContentProvider, ContentProvider, ProviderConfig};
use crate::error::AppServicesError;
use crate::narration::NarrationPlayer;
use crate::progress_store::ProgressStore;
use crate::sessions::{SessionConfig, SessionController};
use crate::Clock;

/// Assembles app-facing services around one storage backend.
#[derive(Clone)]
pub struct AppServices {
    progress: ProgressStore,
    provider: Arc<dyn ContentProvider>,
    provider_enabled: bool,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the provider configured
    /// in the environment.
    ///
    /// A missing API key is not an error; lessons will then fail to load and
    /// the learner is told so.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// provider settings in the environment are invalid.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let config = ProviderConfig::from_env()?;
        if config.is_none() {
            tracing::warn!("no content provider API key configured; lessons will not load");
        }
        let provider = ChatContentProvider::new(config, clock);
        let provider_enabled = provider.enabled();
        Ok(Self {
            progress: ProgressStore::new(Arc::clone(&storage.learner_slots)),
            provider: Arc::new(provider),
            provider_enabled,
        })
    }

    /// In-memory storage with a caller-supplied provider.
    #[must_use]
    pub fn in_memory(provider: Arc<dyn ContentProvider>) -> Self {
        let storage = Storage::in_memory();
        Self {
            progress: ProgressStore::new(Arc::clone(&storage.learner_slots)),
            provider,
            provider_enabled: true,
        }
    }

    #[must_use]
    pub fn progress_store(&self) -> ProgressStore {
        self.progress.clone()
    }

    #[must_use]
    pub fn provider(&self) -> Arc<dyn ContentProvider> {
        Arc::clone(&self.provider)
    }

    #[must_use]
    pub fn provider_enabled(&self) -> bool {
        self.provider_enabled
    }

    /// Start a session, resuming the persisted learner if there is one.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Session` if the persisted learner cannot be read.
    pub async fn session(
        &self,
        player: Arc<dyn NarrationPlayer>,
        config: SessionConfig,
    ) -> Result<SessionController, AppServicesError> {
        let controller =
            SessionController::resume(self.progress_store(), self.provider(), player, config)
                .await?;
        Ok(controller)
    }
}
