pub mod builtin;
pub mod sanitize;

use crate::models::field::{Field, FieldAttrs};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub type CreateFn = fn(FieldAttrs) -> Field;
pub type EmptyValueFn = fn() -> Value;
pub type SanitizeFn = fn(&Field, &Value) -> Value;

/// Palette group a field type is listed under in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Basic,
    Selection,
    Presentation,
    Container,
    Action,
}

/// Capability record of one field type.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub field_type: String,
    /// Stores a value under `key` below its parent's path.
    pub keyed: bool,
    /// May claim `path` as a prefix for its descendants.
    pub pathed: bool,
    pub label: Option<String>,
    pub group: FieldGroup,
    pub empty_value: Option<EmptyValueFn>,
    pub sanitize_value: Option<SanitizeFn>,
    pub create: CreateFn,
}

impl FieldDefinition {
    pub fn new(field_type: impl Into<String>, group: FieldGroup) -> Self {
        Self {
            field_type: field_type.into(),
            keyed: false,
            pathed: false,
            label: None,
            group,
            empty_value: None,
            sanitize_value: None,
            create: Field::from_attrs,
        }
    }

    pub fn keyed(mut self) -> Self {
        self.keyed = true;
        self
    }

    pub fn pathed(mut self) -> Self {
        self.pathed = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_empty_value(mut self, empty_value: EmptyValueFn) -> Self {
        self.empty_value = Some(empty_value);
        self
    }

    pub fn with_sanitizer(mut self, sanitize_value: SanitizeFn) -> Self {
        self.sanitize_value = Some(sanitize_value);
        self
    }

    pub fn with_create(mut self, create: CreateFn) -> Self {
        self.create = create;
        self
    }

    /// Value a keyed field of this type starts out with; `null` when undeclared.
    pub fn empty(&self) -> Value {
        self.empty_value.map(|f| f()).unwrap_or(Value::Null)
    }

    pub fn sanitize(&self, field: &Field, value: &Value) -> Value {
        match self.sanitize_value {
            Some(sanitize) => sanitize(field, value),
            None => value.clone(),
        }
    }
}

/// Read-only lookup from type tag to [`FieldDefinition`].
///
/// Built once (registering any custom types), then shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    definitions: HashMap<String, FieldDefinition>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with every built-in type.
    pub fn builtin() -> Self {
        let mut form_fields = Self::new();
        for definition in builtin::definitions() {
            form_fields.register(definition);
        }
        form_fields
    }

    /// Adds or replaces the definition for `definition.field_type`.
    pub fn register(&mut self, definition: FieldDefinition) {
        tracing::debug!("registered form field type <{}>", definition.field_type);
        self.definitions
            .insert(definition.field_type.clone(), definition);
    }

    pub fn get(&self, field_type: &str) -> Option<&FieldDefinition> {
        self.definitions.get(field_type)
    }

    pub fn contains(&self, field_type: &str) -> bool {
        self.definitions.contains_key(field_type)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

static BUILTIN_FORM_FIELDS: Lazy<Arc<FormFields>> = Lazy::new(|| Arc::new(FormFields::builtin()));

/// Process-wide registry of the built-in field types.
pub fn builtin_form_fields() -> Arc<FormFields> {
    Arc::clone(&BUILTIN_FORM_FIELDS)
}
