use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Named slots holding a whole serialized learner record.
///
/// `Active` is the signed-in learner. `Shelved` keeps the most recently
/// signed-out learner so the same identity can pick up where it left off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LearnerSlot {
    Active,
    Shelved,
}

impl LearnerSlot {
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            LearnerSlot::Active => "academy_learner",
            LearnerSlot::Shelved => "academy_learner_shelf",
        }
    }
}

impl fmt::Display for LearnerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whole-record persistence for learner slots.
///
/// There are no partial-field updates and no schema versioning of payloads;
/// callers always write the full record.
#[async_trait]
pub trait LearnerSlotRepository: Send + Sync {
    /// Read the raw payload stored in `slot`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn read_slot(&self, slot: LearnerSlot) -> Result<Option<String>, StorageError>;

    /// Replace the payload stored in `slot`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payload cannot be stored.
    async fn write_slot(&self, slot: LearnerSlot, payload: &str) -> Result<(), StorageError>;

    /// Remove `slot`. Removing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn delete_slot(&self, slot: LearnerSlot) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slots: Arc<Mutex<HashMap<LearnerSlot, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LearnerSlotRepository for InMemoryRepository {
    async fn read_slot(&self, slot: LearnerSlot) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&slot).cloned())
    }

    async fn write_slot(&self, slot: LearnerSlot, payload: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(slot, payload.to_owned());
        Ok(())
    }

    async fn delete_slot(&self, slot: LearnerSlot) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&slot);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub learner_slots: Arc<dyn LearnerSlotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            learner_slots: Arc::new(InMemoryRepository::new()),
        }
    }
}
