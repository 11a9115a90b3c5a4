use serde::Serialize;

use models::PassengerRecord;

/// One entry of the passenger picker: what to show and which id it stands for.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

/// Picker entries: the "new passenger" sentinel (empty value) first, then one
/// entry per record in stored order.
///
/// Without a selected id the sentinel is selected. With one, only the entry
/// carrying that id is, so an unknown id leaves nothing selected.
pub fn build_options(
    records: &[PassengerRecord],
    selected_id: Option<&str>,
    new_label: &str,
    unnamed_label: &str,
) -> Vec<SelectOption> {
    let selected_id = selected_id.filter(|id| !id.is_empty());
    let mut options = Vec::with_capacity(records.len() + 1);
    options.push(SelectOption {
        label: new_label.to_string(),
        value: String::new(),
        selected: selected_id.is_none(),
    });
    options.extend(records.iter().map(|p| SelectOption {
        label: p.display_name_or(unnamed_label),
        value: p.id.clone(),
        selected: selected_id == Some(p.id.as_str()),
    }));
    options
}
