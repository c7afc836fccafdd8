use crate::core::error::{FieldError, Result};
use crate::core::form_field_registry::FormFieldRegistry;
use crate::core::path_registry::PathRegistry;
use crate::models::definitions::builtin::ROOT_TYPE;
use crate::models::definitions::FormFields;
use crate::models::field::{split_path, Field, FieldAttrs};
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;

const KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Source of the random suffix used for synthesized keys.
pub trait KeySource: std::fmt::Debug {
    fn next_suffix(&mut self, len: usize) -> String;
}

/// Lowercase alphanumeric suffixes from the thread-local RNG.
#[derive(Debug, Default)]
pub struct RandomKeys;

impl KeySource for RandomKeys {
    fn next_suffix(&mut self, len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len.max(1))
            .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryOptions {
    pub field_id_prefix: String,
    pub form_id_prefix: String,
    pub key_suffix_length: usize,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            field_id_prefix: "Field_".to_string(),
            form_id_prefix: "Form_".to_string(),
            key_suffix_length: 5,
        }
    }
}

/// The per-form registries, always created and dropped together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormContext {
    pub(crate) fields: FormFieldRegistry,
    pub(crate) paths: PathRegistry,
}

impl FormContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FormFieldRegistry {
        &self.fields
    }

    pub fn paths(&self) -> &PathRegistry {
        &self.paths
    }

    pub fn value_path(&self, id: &str) -> Option<Vec<String>> {
        self.fields
            .get(id)
            .map(|field| self.paths.get_value_path(field, &self.fields))
    }
}

/// Builds fields and registers them with a [`FormContext`].
#[derive(Debug)]
pub struct FieldFactory {
    form_fields: Arc<FormFields>,
    options: FactoryOptions,
    keys: Box<dyn KeySource>,
}

impl FieldFactory {
    pub fn new(form_fields: Arc<FormFields>, options: FactoryOptions) -> Self {
        Self {
            form_fields,
            options,
            keys: Box::new(RandomKeys),
        }
    }

    pub fn with_key_source(mut self, keys: impl KeySource + 'static) -> Self {
        self.keys = Box::new(keys);
        self
    }

    pub fn form_fields(&self) -> &FormFields {
        &self.form_fields
    }

    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    /// Validates `attrs`, builds the field and registers it: id claimed, key
    /// and path claimed, added to the registry and appended to its parent.
    ///
    /// All checks run before anything is written, so an error leaves `ctx`
    /// exactly as it was.
    pub fn create<'c>(
        &mut self,
        ctx: &'c mut FormContext,
        attrs: FieldAttrs,
        apply_defaults: bool,
    ) -> Result<&'c Field> {
        let form_fields = Arc::clone(&self.form_fields);
        let attrs = attrs.normalized();

        let definition = form_fields
            .get(&attrs.field_type)
            .ok_or_else(|| FieldError::unsupported(attrs.field_type.as_str()))?;

        if let Some(id) = &attrs.id {
            if ctx.fields.ids().assigned(id) {
                tracing::warn!("rejected field: id <{}> already exists", id);
                return Err(FieldError::DuplicateId(id.clone()));
            }
        }

        let parent = match &attrs.parent {
            Some(parent_id) => {
                let parent = ctx
                    .fields
                    .get(parent_id)
                    .ok_or_else(|| FieldError::ParentNotFound(parent_id.clone()))?;
                if !parent.is_container() {
                    return Err(FieldError::InvalidSchema(format!(
                        "form field <{}> of type <{}> cannot hold children",
                        parent.id, parent.field_type
                    )));
                }
                Some(parent)
            }
            None => None,
        };

        let parent_path = parent
            .map(|p| ctx.paths.get_value_path(p, &ctx.fields))
            .unwrap_or_default();

        let is_root = attrs.field_type == ROOT_TYPE && parent.is_none();
        if is_root && !ctx.paths.can_claim_path(&[], false) {
            return Err(FieldError::PathConflict(String::new()));
        }

        if definition.keyed {
            if let Some(key) = &attrs.key {
                check_claim(&ctx.paths, &parent_path, key, true)?;
            }
        }

        if definition.pathed {
            if let Some(path) = &attrs.path {
                check_claim(&ctx.paths, &parent_path, path, false)?;
            }
        }

        // validated; from here on nothing fails

        let mut attrs = attrs;
        if apply_defaults {
            if let Some(label) = &definition.label {
                attrs
                    .properties
                    .entry("label")
                    .or_insert_with(|| Value::String(label.clone()));
            }
        }

        let mut field = (definition.create)(attrs);

        // bindings of types that do not bind stay plain properties
        if !definition.keyed {
            if let Some(key) = field.key.take() {
                field.properties.insert("key".into(), Value::String(key));
            }
        }
        if !definition.pathed {
            if let Some(path) = field.path.take() {
                field.properties.insert("path".into(), Value::String(path));
            }
        }

        self.ensure_id(ctx, &mut field);

        if definition.keyed {
            self.ensure_key(ctx, &mut field, &parent_path);
        }

        if definition.pathed {
            if let Some(path) = &field.path {
                let full = joined(&parent_path, path);
                ctx.paths.claim_path(&full, false, &field.id);
            }
        }

        if is_root {
            ctx.paths.claim_path(&[], false, &field.id);
        }

        let id = field.id.clone();
        if let Some(parent_id) = &field.parent {
            if let Some(components) = ctx
                .fields
                .get_mut(parent_id)
                .and_then(|p| p.components.as_mut())
            {
                components.push(id.clone());
            }
        }

        tracing::debug!("created <{}> field {}", field.field_type, id);
        ctx.fields.add(field);

        ctx.fields
            .get(&id)
            .ok_or(FieldError::FieldNotFound(id))
    }

    fn ensure_id(&mut self, ctx: &mut FormContext, field: &mut Field) {
        if !field.id.is_empty() {
            // availability was checked before construction
            if let Err(err) = ctx.fields.ids_mut().claim(&field.id, &field.field_type) {
                tracing::warn!("{}", err);
            }
            return;
        }

        let prefix = if field.field_type == ROOT_TYPE {
            &self.options.form_id_prefix
        } else {
            &self.options.field_id_prefix
        };

        field.id = ctx.fields.ids_mut().next_prefixed(prefix, &field.field_type);
    }

    /// Synthesizes `{type}_{suffix}` when no key was supplied, then claims the
    /// resulting path.
    ///
    /// Only direct siblings are consulted for collisions.
    fn ensure_key(&mut self, ctx: &mut FormContext, field: &mut Field, parent_path: &[String]) {
        if field.key.is_none() {
            let sibling_keys: Vec<&str> = field
                .parent
                .as_deref()
                .and_then(|p| ctx.fields.get(p))
                .map(|parent| {
                    parent
                        .children()
                        .iter()
                        .filter_map(|id| ctx.fields.get(id))
                        .filter_map(|child| child.key.as_deref())
                        .collect()
                })
                .unwrap_or_default();

            let key = loop {
                let candidate = format!(
                    "{}_{}",
                    field.field_type,
                    self.keys.next_suffix(self.options.key_suffix_length)
                );
                if !sibling_keys.contains(&candidate.as_str()) {
                    break candidate;
                }
            };

            field.key = Some(key);
        }

        if let Some(key) = &field.key {
            let full = joined(parent_path, key);
            ctx.paths.claim_path(&full, true, &field.id);
        }
    }
}

fn joined(parent_path: &[String], dotted: &str) -> Vec<String> {
    let mut path = parent_path.to_vec();
    path.extend(split_path(dotted));
    path
}

fn check_claim(paths: &PathRegistry, parent_path: &[String], dotted: &str, is_keyed: bool) -> Result<()> {
    let candidate = joined(parent_path, dotted);
    if paths.can_claim_path(&candidate, is_keyed) {
        return Ok(());
    }

    tracing::warn!("rejected field: binding path '{}' is already claimed", candidate.join("."));
    Err(FieldError::path_conflict(&candidate))
}
