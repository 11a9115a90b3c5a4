//! Schema detection and normalization of stored passenger values.
//!
//! Stored lists may mix both record generations. Each element is classified
//! by which properties it carries, decoded into the matching explicit shape,
//! and converted to [`PassengerRecord`].

use serde::Deserialize;
use serde_json::Value;

use crate::coerce::{lenient_id, lenient_string, truthy};
use crate::id::IdSource;
use crate::legacy::LegacyPassenger;
use crate::passenger::PassengerRecord;

/// Any one of these properties, whatever its value, marks a v2 record.
pub const CURRENT_MARKER_KEYS: [&str; 4] = ["lastName", "firstName", "docType", "docNumber"];

/// The v2 shape as found in storage: every field optional, loosely typed.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPassenger {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub middle_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub doc_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub doc_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub benefit_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub loyalty_number: String,
    #[serde(default, deserialize_with = "truthy")]
    pub child_ticket: bool,
}

impl CurrentPassenger {
    pub fn into_record(self, ids: &dyn IdSource) -> PassengerRecord {
        PassengerRecord {
            id: self.id.unwrap_or_else(|| ids.next_id()),
            last_name: self.last_name,
            first_name: self.first_name,
            middle_name: self.middle_name,
            gender: self.gender,
            birth_date: self.birth_date,
            doc_type: self.doc_type,
            doc_number: self.doc_number,
            benefit_type: self.benefit_type,
            loyalty_number: self.loyalty_number,
            child_ticket: self.child_ticket,
        }
    }
}

/// A stored element, tagged by the schema generation it was written with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoredPassenger {
    Current(CurrentPassenger),
    Legacy(LegacyPassenger),
}

impl StoredPassenger {
    /// Whether `raw` carries any v2 marker property.
    pub fn is_current(raw: &Value) -> bool {
        raw.as_object()
            .is_some_and(|obj| CURRENT_MARKER_KEYS.iter().any(|k| obj.contains_key(*k)))
    }

    /// Classify and decode a raw stored element. Never fails: anything that
    /// decodes as neither shape is an empty legacy record.
    pub fn decode(raw: &Value) -> Self {
        if Self::is_current(raw) {
            if let Ok(current) = CurrentPassenger::deserialize(raw) {
                return StoredPassenger::Current(current);
            }
        }
        let legacy = if raw.is_object() {
            LegacyPassenger::deserialize(raw).unwrap_or_default()
        } else {
            LegacyPassenger::default()
        };
        StoredPassenger::Legacy(legacy)
    }

    pub fn into_record(self, ids: &dyn IdSource) -> PassengerRecord {
        match self {
            StoredPassenger::Current(current) => current.into_record(ids),
            StoredPassenger::Legacy(legacy) => legacy.into_record(ids),
        }
    }
}

/// Convert a stored element of either generation to the current shape.
pub fn normalize_passenger(raw: &Value, ids: &dyn IdSource) -> PassengerRecord {
    StoredPassenger::decode(raw).into_record(ids)
}
