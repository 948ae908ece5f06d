//! High score and mute flag persistence
//!
//! Backends implement [`KeyValueStore`]; [`GameStorage`] sits on top and never
//! fails. A broken backend is logged and the game falls back to defaults.

use std::fmt;

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Key holding the best score (JSON number)
pub const HIGH_SCORE_KEY: &str = "hedgehog_game_high_score";
/// Key holding the mute flag (JSON bool)
pub const MUTE_KEY: &str = "hedgehog_game_mute_state";

/// Storage backend failure
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// No backend available (private browsing, storage disabled)
    Unavailable(String),
    Read { key: String, reason: String },
    Write { key: String, reason: String },
    /// Stored value could not be decoded
    Corrupt { key: String, value: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Read { key, reason } => write!(f, "failed to read '{key}': {reason}"),
            Self::Write { key, reason } => write!(f, "failed to write '{key}': {reason}"),
            Self::Corrupt { key, value } => write!(f, "corrupt value for '{key}': {value:?}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Synchronous string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Typed access to the two persisted values
pub struct GameStorage {
    store: Box<dyn KeyValueStore>,
}

impl GameStorage {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Volatile storage for native runs and tests
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Best score so far, 0 when missing or unreadable
    pub fn high_score(&self) -> u64 {
        self.load(HIGH_SCORE_KEY).unwrap_or(0)
    }

    pub fn save_high_score(&mut self, score: u64) {
        self.save(HIGH_SCORE_KEY, &score);
    }

    /// Saved mute flag, false when missing or unreadable
    pub fn muted(&self) -> bool {
        self.load(MUTE_KEY).unwrap_or(false)
    }

    pub fn save_muted(&mut self, muted: bool) {
        self.save(MUTE_KEY, &muted);
    }

    /// Forget both values
    pub fn clear_all(&mut self) {
        for key in [HIGH_SCORE_KEY, MUTE_KEY] {
            if let Err(e) = self.store.remove(key) {
                log::warn!("{e}");
            }
        }
    }

    fn load<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("{e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(_) => {
                let e = StorageError::Corrupt {
                    key: key.to_string(),
                    value: raw,
                };
                log::warn!("{e}");
                None
            }
        }
    }

    fn save<T: serde::Serialize>(&mut self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("failed to encode '{key}': {e}");
                return;
            }
        };
        match self.store.set(key, &json) {
            Ok(()) => log::debug!("saved {key}={json}"),
            Err(e) => log::warn!("{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (GameStorage, MemoryStore) {
        let store = MemoryStore::new();
        (GameStorage::new(Box::new(store.clone())), store)
    }

    #[test]
    fn test_defaults_when_empty() {
        let (storage, _) = storage();
        assert_eq!(storage.high_score(), 0);
        assert!(!storage.muted());
    }

    #[test]
    fn test_values_survive_new_handle() {
        let (mut storage, store) = storage();
        storage.save_high_score(420);
        storage.save_muted(true);

        let reopened = GameStorage::new(Box::new(store.clone()));
        assert_eq!(reopened.high_score(), 420);
        assert!(reopened.muted());
        assert_eq!(store.raw(HIGH_SCORE_KEY).as_deref(), Some("420"));
        assert_eq!(store.raw(MUTE_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn test_corrupt_values_fall_back() {
        let (storage, mut store) = storage();
        store.set(HIGH_SCORE_KEY, "lots").unwrap();
        store.set(MUTE_KEY, "maybe").unwrap();
        assert_eq!(storage.high_score(), 0);
        assert!(!storage.muted());
    }

    #[test]
    fn test_failing_backend_is_swallowed() {
        let (mut storage, store) = storage();
        storage.save_high_score(10);
        store.set_failing(true);
        assert_eq!(storage.high_score(), 0);
        storage.save_high_score(99);
        storage.clear_all();
        store.set_failing(false);
        assert_eq!(storage.high_score(), 10);
    }

    #[test]
    fn test_clear_all() {
        let (mut storage, store) = storage();
        storage.save_high_score(5);
        storage.save_muted(true);
        storage.clear_all();
        assert!(store.is_empty());
        assert_eq!(storage.high_score(), 0);
    }

    #[test]
    fn test_storage_error_display() {
        let e = StorageError::Write {
            key: HIGH_SCORE_KEY.to_string(),
            reason: "quota".to_string(),
        };
        assert_eq!(e.to_string(), "failed to write 'hedgehog_game_high_score': quota");
    }
}
