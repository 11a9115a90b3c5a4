use std::{collections::HashMap, fs, path::{Path, PathBuf}, sync::RwLock};

use tracing::{debug, warn};

use crate::errors::ServiceError;
use super::KeyValueStorage;

/// JSON file-backed storage area.
///
/// Persists a `HashMap<String, String>` to a single JSON object file and
/// rewrites the whole file on every `set`. Intended for the handful of keys a
/// desktop client keeps locally, where a database is overkill.
#[derive(Debug)]
pub struct JsonFileStorage {
    inner: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

impl JsonFileStorage {
    /// Open the storage area at `path`. Creates the file with an empty map if
    /// missing; an unreadable or corrupt file opens as an empty area.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ServiceError::Storage(e.to_string()))?;
        }

        let map: HashMap<String, String> = match fs::read(&file_path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "storage file is not a JSON string map; starting empty");
                HashMap::new()
            }),
            Err(_) => {
                let empty: HashMap<String, String> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty)?)
                    .map_err(|e| ServiceError::Storage(e.to_string()))?;
                debug!(path = %file_path.display(), "created empty storage file");
                empty
            }
        };

        Ok(Self { inner: RwLock::new(map), file_path })
    }

    pub fn path(&self) -> &Path { &self.file_path }

    fn save(&self, map: &HashMap<String, String>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map)?;
        fs::write(&self.file_path, data).map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| ServiceError::Storage("file storage lock poisoned".into()))?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }
}
