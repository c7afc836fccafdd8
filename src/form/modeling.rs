//! Editor operations. Each one validates completely before touching the
//! registries, so a rejected edit leaves the form as it was.

use super::Form;
use crate::core::error::{FieldError, Result};
use crate::core::path_registry::{ClaimKind, PendingClaim, ValuePathOptions};
use crate::models::field::{split_path, Field, FieldAttrs};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Properties that describe tree structure and cannot be edited directly.
const STRUCTURAL_PROPERTIES: [&str; 3] = ["type", "components", "_parent"];

impl Form {
    /// Creates a field below `parent_id`, inserted at `index` among its siblings
    /// (appended when `None` or out of range).
    pub fn add_field(&mut self, attrs: FieldAttrs, parent_id: &str, index: Option<usize>) -> Result<String> {
        let mut attrs = attrs;
        attrs.parent = Some(parent_id.to_string());

        let id = self
            .factory
            .create(&mut self.context, attrs, true)?
            .id
            .clone();

        if let Some(index) = index {
            if let Some(children) = self.children_mut(parent_id) {
                children.retain(|c| c != &id);
                let index = index.min(children.len());
                children.insert(index, id.clone());
            }
        }

        Ok(id)
    }

    /// Removes a field and its whole subtree, releasing their ids and paths.
    pub fn remove_field(&mut self, id: &str) -> Result<Field> {
        let field = self.lookup(id)?;
        if self.root.as_deref() == Some(id) {
            return Err(FieldError::InvalidEdit("the form root cannot be removed".into()));
        }
        let parent = field.parent.clone();

        let subtree = self.context.fields.subtree_ids(id);
        let owners: HashSet<String> = subtree.iter().cloned().collect();
        self.context.paths.unclaim_owners(&owners);

        let mut removed = None;
        for member in &subtree {
            self.context.fields.ids_mut().unclaim(member);
            let field = self.context.fields.remove(member);
            if member == id {
                removed = field;
            }
        }

        if let Some(children) = parent.as_deref().and_then(|p| self.children_mut(p)) {
            children.retain(|c| c != id);
        }

        tracing::debug!("removed field {} ({} fields in subtree)", id, subtree.len());
        removed.ok_or_else(|| FieldError::FieldNotFound(id.to_string()))
    }

    /// Sets one property of a field.
    ///
    /// `id`, `key` (keyed types) and `path` (pathed types) are re-validated and
    /// re-claimed; any other property is stored as-is, `null` removing it.
    pub fn edit_field(&mut self, id: &str, property: &str, value: Value) -> Result<()> {
        let field = self.lookup(id)?;
        let definition = self
            .definition(&field.field_type)
            .ok_or_else(|| FieldError::unsupported(field.field_type.as_str()))?;
        let (keyed, pathed) = (definition.keyed, definition.pathed);

        if STRUCTURAL_PROPERTIES.contains(&property) {
            return Err(FieldError::InvalidEdit(format!(
                "property '{}' cannot be edited",
                property
            )));
        }

        match property {
            "id" => {
                let new_id = non_empty_string(&value)
                    .ok_or_else(|| FieldError::InvalidEdit("id must be a non-empty string".into()))?;
                self.update_id(id, &new_id)
            }
            "key" if keyed => {
                let key = non_empty_string(&value)
                    .ok_or_else(|| FieldError::InvalidEdit("key must be a non-empty string".into()))?;
                self.rebind(id, Some(key))
            }
            "path" if pathed => {
                let path = match &value {
                    Value::Null => None,
                    Value::String(s) if s.is_empty() => None,
                    Value::String(s) => Some(s.clone()),
                    _ => {
                        return Err(FieldError::InvalidEdit("path must be a string".into()));
                    }
                };
                self.rebind(id, path)
            }
            _ => {
                if let Some(field) = self.context.fields.get_mut(id) {
                    if value.is_null() {
                        field.properties.remove(property);
                    } else {
                        field.properties.insert(property.to_string(), value);
                    }
                }
                Ok(())
            }
        }
    }

    /// Re-parents `id` under `target_id` at `index` (appended when `None`), or
    /// reorders it when the parent stays the same.
    pub fn move_field(&mut self, id: &str, target_id: &str, index: Option<usize>) -> Result<()> {
        let field = self.lookup(id)?;
        let old_parent = field
            .parent
            .clone()
            .ok_or_else(|| FieldError::InvalidMove(format!("field <{}> has no parent", id)))?;

        let target = self.lookup(target_id)?;
        if !target.is_container() {
            return Err(FieldError::InvalidMove(format!(
                "form field <{}> cannot hold children",
                target_id
            )));
        }
        if self.context.fields.is_ancestor_or_self(id, target_id) {
            return Err(FieldError::InvalidMove(format!(
                "cannot move <{}> into its own subtree",
                id
            )));
        }

        if old_parent != target_id {
            let base = self.context.paths.get_value_path(target, &self.context.fields);
            let options = ValuePathOptions {
                replacements: HashMap::new(),
                cutoff: Some(old_parent.clone()),
            };
            self.reclaim_subtree(id, &options, &base)?;

            if let Some(field) = self.context.fields.get_mut(id) {
                field.parent = Some(target_id.to_string());
            }
        }

        if let Some(children) = self.children_mut(&old_parent) {
            children.retain(|c| c != id);
        }
        if let Some(children) = self.children_mut(target_id) {
            let index = index.unwrap_or(children.len()).min(children.len());
            children.insert(index, id.to_string());
        }

        tracing::debug!("moved field {} to {}", id, target_id);
        Ok(())
    }

    /// Gives a keyed field a new key, or a pathed field a new (or no) path. The
    /// field's subtree is re-claimed under the new binding as one swap.
    fn rebind(&mut self, id: &str, binding: Option<String>) -> Result<()> {
        let field = self.lookup(id)?;
        if field.key.as_ref().or(field.path.as_ref()) == binding.as_ref() {
            return Ok(());
        }
        let keyed = field.key.is_some();

        let local = binding.as_deref().map(split_path).unwrap_or_default();
        let options = ValuePathOptions {
            replacements: [(id.to_string(), local)].into_iter().collect(),
            cutoff: None,
        };
        self.reclaim_subtree(id, &options, &[])?;

        if let Some(field) = self.context.fields.get_mut(id) {
            if keyed {
                field.key = binding;
            } else {
                field.path = binding;
            }
        }
        Ok(())
    }

    /// Recomputes the claims of `id`'s subtree as resolved with `options`
    /// (prefixed with `base`) and swaps them in atomically.
    fn reclaim_subtree(&mut self, id: &str, options: &ValuePathOptions, base: &[String]) -> Result<()> {
        let subtree = self.context.fields.subtree_ids(id);
        let mut pending = Vec::new();

        for member in &subtree {
            let Some(field) = self.get(member) else {
                continue;
            };
            let Some(definition) = self.definition(&field.field_type) else {
                continue;
            };

            let local = options
                .replacements
                .get(member)
                .cloned()
                .unwrap_or_else(|| field.local_segments());

            let kind = if definition.keyed {
                ClaimKind::Keyed
            } else if definition.pathed && !local.is_empty() {
                ClaimKind::Pathed
            } else {
                continue;
            };

            let mut path = base.to_vec();
            path.extend(
                self.context
                    .paths
                    .get_value_path_with(field, &self.context.fields, options),
            );

            pending.push(PendingClaim {
                path,
                kind,
                owner: member.clone(),
            });
        }

        let owners: HashSet<String> = subtree.into_iter().collect();
        self.context.paths.replace_claims(&owners, &pending)
    }

    fn update_id(&mut self, id: &str, new_id: &str) -> Result<()> {
        if id == new_id {
            return Ok(());
        }
        if self.context.fields.ids().assigned(new_id) {
            tracing::warn!("rejected id change: <{}> already exists", new_id);
            return Err(FieldError::DuplicateId(new_id.to_string()));
        }

        let field = self.lookup(id)?;
        let field_type = field.field_type.clone();
        let parent = field.parent.clone();
        let children = field.children().to_vec();

        let ids = self.context.fields.ids_mut();
        ids.unclaim(id);
        ids.claim(new_id, &field_type)?;

        self.context.fields.rename(id, new_id);
        self.context.paths.rename_owner(id, new_id);

        for child in &children {
            if let Some(child) = self.context.fields.get_mut(child) {
                child.parent = Some(new_id.to_string());
            }
        }
        if let Some(siblings) = parent.as_deref().and_then(|p| self.children_mut(p)) {
            for sibling in siblings.iter_mut().filter(|s| s.as_str() == id) {
                *sibling = new_id.to_string();
            }
        }
        if self.root.as_deref() == Some(id) {
            self.root = Some(new_id.to_string());
        }

        tracing::debug!("renamed field {} to {}", id, new_id);
        Ok(())
    }

    fn lookup(&self, id: &str) -> Result<&Field> {
        self.get(id)
            .ok_or_else(|| FieldError::FieldNotFound(id.to_string()))
    }

    fn children_mut(&mut self, id: &str) -> Option<&mut Vec<String>> {
        self.context
            .fields
            .get_mut(id)
            .and_then(|f| f.components.as_mut())
    }
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}
