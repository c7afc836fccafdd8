use crate::models::field::Field;
use serde_json::{Number, Value};

/// Fields whose options are resolved from input data at runtime.
fn has_dynamic_options(field: &Field) -> bool {
    field.property_str("valuesKey").is_some()
}

fn static_option_values(field: &Field) -> Vec<&Value> {
    field
        .property("values")
        .and_then(Value::as_array)
        .map(|options| options.iter().filter_map(|o| o.get("value")).collect())
        .unwrap_or_default()
}

pub fn sanitize_string(_field: &Field, value: &Value) -> Value {
    match value {
        Value::String(_) => value.clone(),
        _ => Value::String(String::new()),
    }
}

pub fn sanitize_number(_field: &Field, value: &Value) -> Value {
    match value {
        Value::Number(_) => value.clone(),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

pub fn sanitize_bool(_field: &Field, value: &Value) -> Value {
    Value::Bool(value.as_bool().unwrap_or(false))
}

pub fn sanitize_datetime(_field: &Field, value: &Value) -> Value {
    match value {
        Value::String(s) if !s.is_empty() => value.clone(),
        _ => Value::Null,
    }
}

/// A single selection must be one of the declared options.
pub fn sanitize_single_select(field: &Field, value: &Value) -> Value {
    if has_dynamic_options(field) {
        return value.clone();
    }

    if static_option_values(field).contains(&value) {
        value.clone()
    } else {
        Value::Null
    }
}

/// Drops every selected value that is not a declared option.
pub fn sanitize_multi_select(field: &Field, value: &Value) -> Value {
    let Some(selected) = value.as_array() else {
        return Value::Array(Vec::new());
    };

    if has_dynamic_options(field) {
        return value.clone();
    }

    let options = static_option_values(field);
    Value::Array(
        selected
            .iter()
            .filter(|v| options.contains(v))
            .cloned()
            .collect(),
    )
}
