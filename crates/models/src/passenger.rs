use serde::{Deserialize, Serialize};

use configs::DEFAULT_UNNAMED_PASSENGER;

/// Passenger record in the current (v2) split-field shape.
///
/// Every field is written on save; all of them are optional on read and fall
/// back to their defaults. `id` identifies the record within the stored list
/// and never changes once assigned.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PassengerRecord {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub gender: String,
    pub birth_date: String,
    pub doc_type: String,
    pub doc_number: String,
    pub benefit_type: String,
    pub loyalty_number: String,
    pub child_ticket: bool,
}

impl PassengerRecord {
    /// Full name for display, or `placeholder` when every name part is blank.
    pub fn display_name_or(&self, placeholder: &str) -> String {
        let full = [&self.last_name, &self.first_name, &self.middle_name]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() { placeholder.to_string() } else { full }
    }

    /// Full name with the default placeholder.
    pub fn display_name(&self) -> String {
        self.display_name_or(DEFAULT_UNNAMED_PASSENGER)
    }

    /// `"<type> <number>"` when both are present, otherwise just the number.
    pub fn document_line(&self) -> String {
        let doc_type = self.doc_type.trim();
        let doc_number = self.doc_number.trim();
        if !doc_type.is_empty() && !doc_number.is_empty() {
            format!("{doc_type} {doc_number}")
        } else {
            doc_number.to_string()
        }
    }
}

pub fn display_name(p: &PassengerRecord) -> String {
    p.display_name()
}

pub fn document_line(p: &PassengerRecord) -> String {
    p.document_line()
}
