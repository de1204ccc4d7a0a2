use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::error::{CoreError, CoreErrorCode};

const APP_DIR: &str = "d2-item-lister";

/// Durable string key-value storage for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::new(CoreErrorCode::Storage, "memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::new(CoreErrorCode::Storage, "memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<config dir>/d2-item-lister`, or the working directory when the
    /// platform has no config dir.
    pub fn default_location() -> Self {
        let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push(APP_DIR);
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(CoreError::new(
                CoreErrorCode::Storage,
                format!("invalid preference key '{key}'"),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to create {}: {e}", self.dir.display()),
            )
        })?;
        fs::write(&path, value).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to write {}: {e}", path.display()),
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
}

/// Wraps a pure reducer with write-through persistence.
///
/// Nothing is written until [`StoredReducer::hydrate`] has run, so the
/// in-memory default can never overwrite a stored value that has not been
/// read yet. Store failures are logged and never reach the caller.
pub struct StoredReducer<S, A> {
    state: S,
    reducer: fn(&S, A) -> S,
    store: Box<dyn PreferenceStore>,
    key: String,
    load_state: LoadState,
}

impl<S, A> StoredReducer<S, A>
where
    S: Serialize + DeserializeOwned,
{
    pub fn new(
        reducer: fn(&S, A) -> S,
        initial: S,
        store: Box<dyn PreferenceStore>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            state: initial,
            reducer,
            store,
            key: key.into(),
            load_state: LoadState::NotLoaded,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored value once. A decodable value replaces the current
    /// state; a missing, unreadable or undecodable one keeps it. Either way
    /// the reducer is `Loaded` afterwards and the current state is written
    /// back.
    pub fn hydrate(&mut self) {
        if self.load_state == LoadState::Loaded {
            return;
        }

        match self.store.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<S>(&raw) {
                Ok(stored) => {
                    info!(key = %self.key, "restored stored preferences");
                    self.state = stored;
                }
                Err(err) => warn!(key = %self.key, %err, "ignoring undecodable stored value"),
            },
            Ok(None) => debug!(key = %self.key, "no stored value, keeping defaults"),
            Err(err) => warn!(key = %self.key, %err, "failed to read stored value"),
        }

        self.load_state = LoadState::Loaded;
        self.persist();
    }

    pub fn dispatch(&mut self, action: A) -> &S {
        self.state = (self.reducer)(&self.state, action);
        if self.load_state == LoadState::Loaded {
            self.persist();
        }
        &self.state
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.state) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(key = %self.key, %err, "failed to encode state for storage");
                return;
            }
        };
        if let Err(err) = self.store.set(&self.key, &encoded) {
            warn!(key = %self.key, %err, "failed to write stored value");
        }
    }
}
