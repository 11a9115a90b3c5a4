//! The v1 record shape, where the full name and the document were free text.

use serde::Deserialize;

use crate::coerce::{lenient_id, lenient_string, truthy};
use crate::id::IdSource;
use crate::passenger::PassengerRecord;

/// `{ id, name, document, benefit, loyalty, childTicket }`, read-only.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPassenger {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub document: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub benefit: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub loyalty: String,
    #[serde(default, deserialize_with = "truthy")]
    pub child_ticket: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameParts {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentParts {
    pub doc_type: String,
    pub doc_number: String,
}

/// Split "Last First Middle..." on whitespace runs; everything after the
/// second token belongs to the middle name.
pub fn split_full_name(name: &str) -> NameParts {
    let mut parts = name.split_whitespace();
    let last_name = parts.next().unwrap_or_default().to_string();
    let first_name = parts.next().unwrap_or_default().to_string();
    let middle_name = parts.collect::<Vec<_>>().join(" ");
    NameParts { last_name, first_name, middle_name }
}

/// Split "Type Number..." on whitespace. A single token is a bare number.
pub fn split_document(document: &str) -> DocumentParts {
    let trimmed = document.trim();
    let mut parts = trimmed.split_whitespace();
    let Some(first) = parts.next() else {
        return DocumentParts::default();
    };
    let rest = parts.collect::<Vec<_>>();
    if rest.is_empty() {
        return DocumentParts { doc_type: String::new(), doc_number: trimmed.to_string() };
    }
    DocumentParts { doc_type: first.to_string(), doc_number: rest.join(" ") }
}

impl LegacyPassenger {
    /// Upgrade to the current shape, assigning an id when the record had none.
    pub fn into_record(self, ids: &dyn IdSource) -> PassengerRecord {
        let id = self.id.unwrap_or_else(|| ids.next_id());
        let name = split_full_name(&self.name);
        let doc = split_document(&self.document);
        PassengerRecord {
            id,
            last_name: name.last_name,
            first_name: name.first_name,
            middle_name: name.middle_name,
            gender: String::new(),
            birth_date: String::new(),
            doc_type: doc.doc_type,
            doc_number: doc.doc_number,
            benefit_type: self.benefit,
            loyalty_number: self.loyalty,
            child_ticket: self.child_ticket,
        }
    }
}
