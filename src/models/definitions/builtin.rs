use super::sanitize::{
    sanitize_bool, sanitize_datetime, sanitize_multi_select, sanitize_number,
    sanitize_single_select, sanitize_string,
};
use super::{FieldDefinition, FieldGroup};
use crate::models::field::{Field, FieldAttrs};
use serde_json::{json, Value};

/// Type tag of the implicit form root.
pub const ROOT_TYPE: &str = "default";

pub mod datetime {
    pub const SUBTYPE_PATH: &str = "subtype";
    pub const DATE_LABEL_PATH: &str = "dateLabel";
    pub const TIME_LABEL_PATH: &str = "timeLabel";
    pub const TIME_SERIALISING_FORMAT_PATH: &str = "timeSerializingFormat";

    pub const SUBTYPE_DATE: &str = "date";
    pub const SUBTYPE_TIME: &str = "time";
    pub const SUBTYPE_DATETIME: &str = "datetime";

    pub const TIME_SERIALISING_FORMATS: [(&str, &str); 3] = [
        ("utc_offset", "UTC offset"),
        ("utc_normalized", "UTC normalized"),
        ("no_timezone", "No timezone"),
    ];
}

/// Every built-in type, in palette order.
pub fn definitions() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new(ROOT_TYPE, FieldGroup::Container).with_create(Field::container_from_attrs),
        FieldDefinition::new("group", FieldGroup::Container)
            .pathed()
            .with_label("Group")
            .with_create(Field::container_from_attrs),
        FieldDefinition::new("text", FieldGroup::Basic)
            .keyed()
            .with_label("Text field")
            .with_empty_value(empty_string)
            .with_sanitizer(sanitize_string),
        FieldDefinition::new("textarea", FieldGroup::Basic)
            .keyed()
            .with_label("Text area")
            .with_empty_value(empty_string)
            .with_sanitizer(sanitize_string),
        FieldDefinition::new("number", FieldGroup::Basic)
            .keyed()
            .with_label("Number")
            .with_sanitizer(sanitize_number),
        FieldDefinition::new("datetime", FieldGroup::Basic)
            .keyed()
            .with_sanitizer(sanitize_datetime)
            .with_create(create_datetime),
        FieldDefinition::new("checkbox", FieldGroup::Selection)
            .keyed()
            .with_label("Checkbox")
            .with_empty_value(empty_false)
            .with_sanitizer(sanitize_bool),
        FieldDefinition::new("checklist", FieldGroup::Selection)
            .keyed()
            .with_label("Checklist")
            .with_empty_value(empty_list)
            .with_sanitizer(sanitize_multi_select)
            .with_create(create_with_options),
        FieldDefinition::new("radio", FieldGroup::Selection)
            .keyed()
            .with_label("Radio group")
            .with_sanitizer(sanitize_single_select)
            .with_create(create_with_options),
        FieldDefinition::new("select", FieldGroup::Selection)
            .keyed()
            .with_label("Select")
            .with_sanitizer(sanitize_single_select)
            .with_create(create_with_options),
        FieldDefinition::new("taglist", FieldGroup::Selection)
            .keyed()
            .with_label("Tag list")
            .with_empty_value(empty_list)
            .with_sanitizer(sanitize_multi_select)
            .with_create(create_with_options),
        FieldDefinition::new("image", FieldGroup::Presentation),
        FieldDefinition::new("iframe", FieldGroup::Presentation).with_label("iFrame"),
        FieldDefinition::new("html", FieldGroup::Presentation),
        FieldDefinition::new("spacer", FieldGroup::Presentation),
        FieldDefinition::new("separator", FieldGroup::Presentation),
        FieldDefinition::new("button", FieldGroup::Action)
            .with_label("Button")
            .with_create(create_button),
    ]
}

fn empty_string() -> Value {
    Value::String(String::new())
}

fn empty_false() -> Value {
    Value::Bool(false)
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

/// Static option lists start empty unless options come from input data.
fn create_with_options(mut attrs: FieldAttrs) -> Field {
    if !attrs.properties.contains_key("values") && !attrs.properties.contains_key("valuesKey") {
        attrs.properties.insert("values".into(), json!([]));
    }
    Field::from_attrs(attrs)
}

fn create_datetime(mut attrs: FieldAttrs) -> Field {
    let props = &mut attrs.properties;

    let subtype = props
        .entry(datetime::SUBTYPE_PATH)
        .or_insert_with(|| json!(datetime::SUBTYPE_DATE))
        .as_str()
        .unwrap_or(datetime::SUBTYPE_DATE)
        .to_string();

    let has_date = subtype == datetime::SUBTYPE_DATE || subtype == datetime::SUBTYPE_DATETIME;
    let has_time = subtype == datetime::SUBTYPE_TIME || subtype == datetime::SUBTYPE_DATETIME;

    if has_date {
        props
            .entry(datetime::DATE_LABEL_PATH)
            .or_insert_with(|| json!("Date"));
    }

    if has_time {
        props
            .entry(datetime::TIME_LABEL_PATH)
            .or_insert_with(|| json!("Time"));
        props
            .entry(datetime::TIME_SERIALISING_FORMAT_PATH)
            .or_insert_with(|| json!(datetime::TIME_SERIALISING_FORMATS[0].0));
    }

    Field::from_attrs(attrs)
}

fn create_button(mut attrs: FieldAttrs) -> Field {
    attrs
        .properties
        .entry("action")
        .or_insert_with(|| json!("submit"));
    Field::from_attrs(attrs)
}
