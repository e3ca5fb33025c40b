use crate::errors::PersistenceError;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{debug, error, warn};

/// Durable string key/value medium the dashboard mirrors its documents into.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError>;
}

/// One `<key>.json` file per dataset under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, io::Error> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    writes: HashMap<String, usize>,
    reject_writes: bool,
}

/// In-process medium. Cloning shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `set` fail, the way a full browser quota does.
    pub fn reject_writes(&self, reject: bool) {
        self.lock().reject_writes = reject;
    }

    /// Number of accepted or attempted writes for `key`.
    pub fn write_count(&self, key: &str) -> usize {
        self.lock().writes.get(key).copied().unwrap_or(0)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: impl Into<String>) {
        self.lock().values.insert(key.to_string(), value.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.lock().values.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        let mut inner = self.lock();
        *inner.writes.entry(key.to_string()).or_default() += 1;
        if inner.reject_writes {
            return Err(PersistenceError::Rejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        inner.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON load/save boundary shared by every store.
#[derive(Clone)]
pub struct Persistence {
    backend: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Missing and unreadable documents both come back as `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = match self.backend.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(key, "no stored document");
                return None;
            }
            Err(err) => {
                error!(key, "failed to read stored document: {err}");
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(document) => Some(document),
            Err(err) => {
                warn!(key, "discarding corrupt stored document: {err}");
                None
            }
        }
    }

    /// Replaces the whole document stored under `key`.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, document: &T) -> Result<(), PersistenceError> {
        let result = serde_json::to_string_pretty(document)
            .map_err(PersistenceError::from)
            .and_then(|payload| self.backend.set(key, payload));
        if let Err(err) = &result {
            error!(key, "failed to persist document: {err}");
        }
        result
    }
}
