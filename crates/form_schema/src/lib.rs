use serde_json::Value;
use std::path::Path;
use thiserror::Error;

pub mod model {
    use serde::{Deserialize, Serialize};
    use serde_json::{Map, Value};

    /// A single field descriptor as persisted in a form schema.
    ///
    /// Only the attributes the registry cares about are typed; everything else
    /// (`label`, `values`, `validate`, `schemaVersion`, ...) is carried through
    /// `properties` untouched.
    #[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
    pub struct SchemaNode {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
        #[serde(rename = "type")]
        pub field_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub path: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub components: Option<Vec<SchemaNode>>,
        #[serde(flatten)]
        pub properties: Map<String, Value>,
    }

    impl SchemaNode {
        pub fn new(field_type: impl Into<String>) -> Self {
            Self {
                field_type: field_type.into(),
                ..Default::default()
            }
        }

        /// Children in declaration order; empty for leaf descriptors.
        pub fn children(&self) -> &[SchemaNode] {
            self.components.as_deref().unwrap_or(&[])
        }
    }

    /// One step of a pre-order walk over a schema tree.
    #[derive(Debug, Clone, Copy)]
    pub struct Visit<'a> {
        pub node: &'a SchemaNode,
        /// Position of the parent within the same walk; `None` for the root.
        pub parent: Option<usize>,
        pub depth: usize,
    }
}

use model::{SchemaNode, Visit};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse schema JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid schema: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

pub fn parse_schema(text: &str) -> Result<SchemaNode> {
    let node: SchemaNode = serde_json::from_str(text)?;
    validate_structure(&node)?;
    Ok(node)
}

pub fn schema_from_value(v: Value) -> Result<SchemaNode> {
    let node: SchemaNode = serde_json::from_value(v)?;
    validate_structure(&node)?;
    Ok(node)
}

pub fn read_schema(path: &Path) -> Result<SchemaNode> {
    let text = std::fs::read_to_string(path)?;
    parse_schema(&text)
}

pub fn write_schema(path: &Path, node: &SchemaNode) -> Result<()> {
    let text = serde_json::to_string_pretty(node)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Structural checks that do not need a field type registry: every node names a
/// type, explicit ids/keys/paths are non-blank, and no node carries a
/// `_parent` back-reference (those are derived on import, never persisted).
pub fn validate_structure(root: &SchemaNode) -> Result<()> {
    for visit in preorder(root) {
        let node = visit.node;

        if node.field_type.trim().is_empty() {
            return Err(SchemaError::Invalid(format!(
                "field at depth {} has no type",
                visit.depth
            )));
        }

        for (attr, value) in [("id", &node.id), ("key", &node.key), ("path", &node.path)] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(SchemaError::Invalid(format!(
                    "field of type <{}> has a blank {}",
                    node.field_type, attr
                )));
            }
        }

        if node.properties.contains_key("_parent") {
            return Err(SchemaError::Invalid(format!(
                "field of type <{}> must not persist a _parent reference",
                node.field_type
            )));
        }
    }

    Ok(())
}

/// Walks the tree parents-first, which is the order a registry must be rebuilt in.
pub fn preorder(root: &SchemaNode) -> Vec<Visit<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![(root, None, 0usize)];

    while let Some((node, parent, depth)) = stack.pop() {
        let index = out.len();
        out.push(Visit {
            node,
            parent,
            depth,
        });

        // reversed so the first child is visited first
        for child in node.children().iter().rev() {
            stack.push((child, Some(index), depth + 1));
        }
    }

    out
}

pub fn count_fields(root: &SchemaNode) -> usize {
    1 + root.children().iter().map(count_fields).sum::<usize>()
}
