//! Binding form data to the field tree: seeding initial values and collecting
//! what gets submitted.

use crate::form::Form;
use serde_json::{Map, Value};

/// Builds the data object a viewer starts with.
///
/// Every keyed field gets the value found at its resolved path in `data`
/// (sanitized for its type); missing values fall back to the field's
/// `defaultValue`, then to the type's empty value.
pub fn initial_data(form: &Form, data: &Value) -> Value {
    let mut out = Value::Object(Map::new());

    for field in form.fields().iter() {
        let Some(definition) = form.definition(&field.field_type) else {
            continue;
        };
        if !definition.keyed {
            continue;
        }
        let Some(path) = form.value_path(&field.id) else {
            continue;
        };

        let value = match get_path(data, &path) {
            Some(value) if !value.is_null() => definition.sanitize(field, value),
            _ => field
                .property("defaultValue")
                .cloned()
                .unwrap_or_else(|| definition.empty()),
        };

        set_path(&mut out, &path, value);
    }

    out
}

/// Picks the values of enabled keyed fields out of the viewer state.
pub fn submit_data(form: &Form, state: &Value) -> Value {
    let mut out = Value::Object(Map::new());

    for field in form.fields().iter() {
        let keyed = form
            .definition(&field.field_type)
            .map(|d| d.keyed)
            .unwrap_or(false);
        let disabled = field
            .property("disabled")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !keyed || disabled {
            continue;
        }

        let Some(path) = form.value_path(&field.id) else {
            continue;
        };
        if let Some(value) = get_path(state, &path) {
            set_path(&mut out, &path, value.clone());
        }
    }

    out
}

pub fn get_path<'a>(data: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter()
        .try_fold(data, |current, segment| current.get(segment.as_str()))
}

/// Writes `value` at `path`, creating (or replacing non-object) intermediates.
pub fn set_path(target: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *target = value;
        return;
    };

    let mut current = target;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map
                .entry(segment.as_str())
                .or_insert_with(|| Value::Object(Map::new())),
            _ => return,
        };
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        map.insert(last.clone(), value);
    }
}
