mod modeling;
mod tests;

use crate::core::error::{FieldError, Result};
use crate::core::field_factory::{FactoryOptions, FieldFactory, FormContext};
use crate::core::form_field_registry::FormFieldRegistry;
use crate::core::path_registry::PathRegistry;
use crate::models::definitions::builtin::ROOT_TYPE;
use crate::models::definitions::{builtin_form_fields, FieldDefinition, FormFields};
use crate::models::field::{Field, FieldAttrs};
use form_schema::model::SchemaNode;
use std::sync::Arc;

/// One form instance: its field tree, id pool and path claims, plus the factory
/// that keeps them consistent.
///
/// Readers get shared references only; every mutation goes through `import_schema`
/// or the editing operations.
#[derive(Debug)]
pub struct Form {
    context: FormContext,
    factory: FieldFactory,
    root: Option<String>,
}

impl Form {
    pub fn new(form_fields: Arc<FormFields>, options: FactoryOptions) -> Self {
        Self::from_factory(FieldFactory::new(form_fields, options))
    }

    pub fn from_factory(factory: FieldFactory) -> Self {
        Self {
            context: FormContext::new(),
            factory,
            root: None,
        }
    }

    /// Form over the built-in field types with default id prefixes.
    pub fn with_builtin_fields() -> Self {
        Self::new(builtin_form_fields(), FactoryOptions::default())
    }

    /// Replaces the current tree with the one described by `schema`.
    ///
    /// Fields are created parents-first into a fresh context that is only
    /// installed once every node succeeded; on error the form keeps its
    /// previous state.
    pub fn import_schema(&mut self, schema: &SchemaNode) -> Result<()> {
        if schema.field_type != ROOT_TYPE {
            return Err(FieldError::InvalidSchema(format!(
                "root must be of type <{}>, found <{}>",
                ROOT_TYPE, schema.field_type
            )));
        }

        let mut context = FormContext::new();
        let visits = form_schema::preorder(schema);
        let mut created: Vec<String> = Vec::with_capacity(visits.len());

        for visit in &visits {
            let mut attrs = FieldAttrs::from_schema(visit.node);
            attrs.parent = visit.parent.and_then(|i| created.get(i).cloned());

            let field = self.factory.create(&mut context, attrs, false)?;
            created.push(field.id.clone());
        }

        tracing::info!(
            "imported form {} with {} fields",
            created.first().map(String::as_str).unwrap_or("-"),
            created.len()
        );

        self.context = context;
        self.root = created.into_iter().next();
        Ok(())
    }

    /// Nested schema of the current tree, `None` before anything was imported.
    pub fn export_schema(&self) -> Option<SchemaNode> {
        self.root().map(|root| self.export_node(root))
    }

    fn export_node(&self, field: &Field) -> SchemaNode {
        SchemaNode {
            id: Some(field.id.clone()),
            field_type: field.field_type.clone(),
            key: field.key.clone(),
            path: field.path.clone(),
            components: field.components.as_ref().map(|children| {
                children
                    .iter()
                    .filter_map(|id| self.get(id))
                    .map(|child| self.export_node(child))
                    .collect()
            }),
            properties: field.properties.clone(),
        }
    }

    /// Creates an empty form consisting of just the root field.
    pub fn create_empty(&mut self) -> Result<&Field> {
        let mut context = FormContext::new();
        let id = self
            .factory
            .create(&mut context, FieldAttrs::new(ROOT_TYPE), true)?
            .id
            .clone();

        self.context = context;
        self.root = Some(id.clone());
        self.get(&id).ok_or(FieldError::FieldNotFound(id))
    }

    pub fn root(&self) -> Option<&Field> {
        self.root.as_deref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&Field> {
        self.context.fields.get(id)
    }

    pub fn fields(&self) -> &FormFieldRegistry {
        &self.context.fields
    }

    pub fn paths(&self) -> &PathRegistry {
        &self.context.paths
    }

    pub fn context(&self) -> &FormContext {
        &self.context
    }

    pub fn form_fields(&self) -> &FormFields {
        self.factory.form_fields()
    }

    pub fn definition(&self, field_type: &str) -> Option<&FieldDefinition> {
        self.factory.form_fields().get(field_type)
    }

    /// Resolved value path of a field, `None` for unknown ids.
    pub fn value_path(&self, id: &str) -> Option<Vec<String>> {
        self.context.value_path(id)
    }

    /// Drops every field, id and path claim.
    pub fn clear(&mut self) {
        self.context = FormContext::new();
        self.root = None;
    }
}
