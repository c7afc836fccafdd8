//! Entries of the editor's "General" properties group.
//!
//! Only which entries apply to a field and how they are labelled live here; the
//! entry widgets themselves belong to the editor UI.

use crate::models::definitions::builtin::{datetime, ROOT_TYPE};
use crate::models::definitions::FormFields;
use crate::models::field::Field;
use serde::Serialize;

/// Types whose value the user types or picks.
pub const INPUTS: [&str; 9] = [
    "checkbox",
    "checklist",
    "datetime",
    "number",
    "radio",
    "select",
    "taglist",
    "text",
    "textarea",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyEntry {
    pub id: &'static str,
    pub label: String,
    /// Property of the field the entry reads and writes.
    pub path: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

impl PropertyEntry {
    fn new(id: &'static str, label: impl Into<String>, path: &'static str) -> Self {
        Self {
            id,
            label: label.into(),
            path,
            options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub entries: Vec<PropertyEntry>,
}

/// The "General" group for `field`, `None` when no entry applies.
pub fn general_group(field: &Field, form_fields: &FormFields) -> Option<PropertyGroup> {
    let definition = form_fields.get(&field.field_type);
    let keyed = definition.map(|d| d.keyed).unwrap_or(false);
    let pathed = definition.map(|d| d.pathed).unwrap_or(false);

    let mut entries = Vec::new();

    // field ids are managed by the registry; only the form's own id is editable
    if field.field_type == ROOT_TYPE {
        entries.push(PropertyEntry::new("id", "ID", "id"));
    }

    if has_date(field) {
        entries.push(PropertyEntry::new("date-label", "Date label", datetime::DATE_LABEL_PATH));
    }
    if has_time(field) {
        entries.push(PropertyEntry::new("time-label", "Time label", datetime::TIME_LABEL_PATH));
    }
    if has_label(field) {
        entries.push(PropertyEntry::new("label", label_text(field), "label"));
    }
    if keyed {
        entries.push(PropertyEntry::new("key", "Key", "key"));
    }
    if pathed {
        entries.push(PropertyEntry::new("path", "Path", "path"));
    }
    if has_time(field) {
        let mut entry = PropertyEntry::new(
            "time-format",
            "Time format",
            datetime::TIME_SERIALISING_FORMAT_PATH,
        );
        entry.options = datetime::TIME_SERIALISING_FORMATS
            .iter()
            .map(|(value, label)| SelectOption {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect();
        entries.push(entry);
    }

    if entries.is_empty() {
        return None;
    }

    Some(PropertyGroup {
        id: "general",
        label: "General",
        entries,
    })
}

fn subtype(field: &Field) -> Option<&str> {
    if field.field_type != "datetime" {
        return None;
    }
    field.property_str(datetime::SUBTYPE_PATH)
}

fn has_date(field: &Field) -> bool {
    matches!(
        subtype(field),
        Some(datetime::SUBTYPE_DATE) | Some(datetime::SUBTYPE_DATETIME)
    )
}

fn has_time(field: &Field) -> bool {
    matches!(
        subtype(field),
        Some(datetime::SUBTYPE_TIME) | Some(datetime::SUBTYPE_DATETIME)
    )
}

fn has_label(field: &Field) -> bool {
    let t = field.field_type.as_str();
    INPUTS.contains(&t) || matches!(t, "button" | "group" | "iframe")
}

fn label_text(field: &Field) -> &'static str {
    match field.field_type.as_str() {
        "group" => "Group label",
        "iframe" => "Title",
        _ => "Field label",
    }
}
