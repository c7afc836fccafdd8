use form_schema::model::SchemaNode;
use serde::Serialize;
use serde_json::{Map, Value};

/// A node of the form tree as held by the [`FormFieldRegistry`].
///
/// Children and parent are referenced by id; the registry owns every field.
///
/// [`FormFieldRegistry`]: crate::core::form_field_registry::FormFieldRegistry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: String,
    /// Only set for keyed types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Only set for pathed types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "_parent", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Child ids in order; `None` for leaf types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<String>>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Field {
    /// Plain leaf field built from attributes; the id stays empty when none was supplied.
    pub fn from_attrs(attrs: FieldAttrs) -> Self {
        Self {
            id: attrs.id.unwrap_or_default(),
            field_type: attrs.field_type,
            key: attrs.key,
            path: attrs.path,
            parent: attrs.parent,
            components: None,
            properties: attrs.properties,
        }
    }

    /// Container field with an empty child list.
    pub fn container_from_attrs(attrs: FieldAttrs) -> Self {
        Self {
            components: Some(Vec::new()),
            ..Self::from_attrs(attrs)
        }
    }

    pub fn is_container(&self) -> bool {
        self.components.is_some()
    }

    pub fn children(&self) -> &[String] {
        self.components.as_deref().unwrap_or(&[])
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(Value::as_str)
    }

    /// Segments this field contributes to its own value path: the key for keyed
    /// fields, the path for pathed ones, nothing for pure grouping nodes.
    pub fn local_segments(&self) -> Vec<String> {
        match (&self.key, &self.path) {
            (Some(key), _) => split_path(key),
            (None, Some(path)) => split_path(path),
            (None, None) => Vec::new(),
        }
    }
}

/// Raw attributes a field is created from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAttrs {
    pub id: Option<String>,
    pub field_type: String,
    pub key: Option<String>,
    pub path: Option<String>,
    pub parent: Option<String>,
    pub properties: Map<String, Value>,
}

impl FieldAttrs {
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Attributes of a persisted descriptor; children are created separately.
    pub fn from_schema(node: &SchemaNode) -> Self {
        Self {
            id: node.id.clone(),
            field_type: node.field_type.clone(),
            key: node.key.clone(),
            path: node.path.clone(),
            parent: None,
            properties: node.properties.clone(),
        }
    }

    /// Blank ids, keys, paths and parents count as absent.
    pub(crate) fn normalized(mut self) -> Self {
        for slot in [&mut self.id, &mut self.key, &mut self.path, &mut self.parent] {
            if matches!(slot, Some(v) if v.is_empty()) {
                *slot = None;
            }
        }
        self
    }
}

pub fn split_path(dotted: &str) -> Vec<String> {
    dotted.split('.').map(String::from).collect()
}
