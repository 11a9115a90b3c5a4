use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use configs::{AppConfig, LabelsConfig, DEFAULT_STORAGE_KEY};
use models::{normalize_passenger, IdSource, PassengerRecord, UuidIds};

use crate::errors::ServiceError;
use crate::select::{build_options, SelectOption};
use crate::storage::KeyValueStorage;

/// The passenger list kept under one key of a storage area.
///
/// The store is the only reader and writer of that key. Every read upgrades
/// legacy records to the current shape and writes the list back only when the
/// upgrade changed something, so each record is migrated once.
///
/// Mutations are read-modify-write over the whole list with no locking;
/// callers sharing one storage area must serialize their writes.
pub struct PassengerStore<S> {
    storage: S,
    key: String,
    ids: Arc<dyn IdSource>,
    labels: LabelsConfig,
}

impl<S: KeyValueStorage> PassengerStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: DEFAULT_STORAGE_KEY.to_string(),
            ids: Arc::new(UuidIds),
            labels: LabelsConfig::default(),
        }
    }

    /// Store using the key and labels of an already validated config.
    pub fn from_config(storage: S, cfg: &AppConfig) -> Self {
        Self::new(storage).with_key(cfg.storage.key.clone()).with_labels(cfg.labels.clone())
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_labels(mut self, labels: LabelsConfig) -> Self {
        self.labels = labels;
        self
    }

    pub fn storage_key(&self) -> &str { &self.key }

    pub fn storage(&self) -> &S { &self.storage }

    /// Raw stored elements.
    ///
    /// An absent key, content that is not JSON, and JSON that is not an array
    /// all read as an empty list.
    pub fn load_raw_list(&self) -> Vec<Value> {
        let Some(text) = self.storage.get(&self.key) else {
            return Vec::new();
        };
        if text.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                warn!(key = %self.key, kind = json_kind(&other), "stored passenger list is not an array; treating as empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "stored passenger list is not valid JSON; treating as empty");
                Vec::new()
            }
        }
    }

    /// Serialize `list` as a JSON array and overwrite the stored value.
    pub fn save_raw_list<T: Serialize>(&self, list: &[T]) -> Result<(), ServiceError> {
        let text = serde_json::to_string(list)?;
        self.storage.set(&self.key, &text)
    }

    pub fn normalize(&self, raw: &Value) -> PassengerRecord {
        normalize_passenger(raw, self.ids.as_ref())
    }

    /// All records in the current shape, migrating stored data when needed.
    pub fn load(&self) -> Vec<PassengerRecord> {
        let raw = self.load_raw_list();
        let normalized: Vec<PassengerRecord> = raw.iter().map(|p| self.normalize(p)).collect();

        if differs(&raw, &normalized) {
            match self.save_raw_list(&normalized) {
                Ok(()) => info!(key = %self.key, count = normalized.len(), event = "passengers_migrated", "rewrote passenger list in current shape"),
                // the caller still gets the migrated view; the next load retries
                Err(e) => warn!(key = %self.key, error = %e, "failed to write migrated passenger list"),
            }
        }
        normalized
    }

    /// Insert `passenger`, or replace the stored record with the same id.
    /// Returns the record as stored, with an id assigned if it had none.
    pub fn upsert(&self, passenger: &Value) -> Result<PassengerRecord, ServiceError> {
        let record = self.normalize(passenger);
        let mut list = self.load();
        match list.iter().position(|p| p.id == record.id) {
            Some(idx) => {
                list[idx] = record.clone();
                debug!(id = %record.id, event = "passenger_replaced", "replaced passenger");
            }
            None => {
                list.push(record.clone());
                debug!(id = %record.id, event = "passenger_added", "added passenger");
            }
        }
        self.save_raw_list(&list)?;
        Ok(record)
    }

    /// Typed variant of [`PassengerStore::upsert`]; an empty id gets a fresh one.
    pub fn upsert_record(&self, passenger: PassengerRecord) -> Result<PassengerRecord, ServiceError> {
        let raw = serde_json::to_value(&passenger)?;
        self.upsert(&raw)
    }

    /// Drop every record with `id` and persist. Returns whether any existed;
    /// an unknown id leaves the content unchanged.
    pub fn remove(&self, id: &str) -> Result<bool, ServiceError> {
        let mut list = self.load();
        let before = list.len();
        list.retain(|p| p.id != id);
        let removed = list.len() != before;
        self.save_raw_list(&list)?;
        debug!(%id, removed, event = "passenger_removed", "remove passenger");
        Ok(removed)
    }

    pub fn get_by_id(&self, id: &str) -> Option<PassengerRecord> {
        self.load().into_iter().find(|p| p.id == id)
    }

    /// Full name for display, using the configured placeholder.
    pub fn display_name(&self, p: &PassengerRecord) -> String {
        p.display_name_or(&self.labels.unnamed_passenger)
    }

    pub fn document_line(&self, p: &PassengerRecord) -> String {
        p.document_line()
    }

    /// Picker entries for the current list. See [`build_options`].
    pub fn select_options(&self, selected_id: Option<&str>) -> Vec<SelectOption> {
        build_options(
            &self.load(),
            selected_id,
            &self.labels.new_passenger,
            &self.labels.unnamed_passenger,
        )
    }
}

/// Whether normalization changed the stored list.
fn differs(raw: &[Value], normalized: &[PassengerRecord]) -> bool {
    raw.len() != normalized.len()
        || raw.iter().zip(normalized).any(|(r, n)| match serde_json::to_value(n) {
            Ok(v) => &v != r,
            Err(_) => true,
        })
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
