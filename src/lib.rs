pub mod config;
pub mod core;
pub mod data;
pub mod form;
pub mod models;
pub mod properties;

use crate::config::Config;
use crate::form::Form;
use crate::models::definitions::builtin_form_fields;
use anyhow::Context;
use std::fs;

/// Loads the configured schema into a form, binds the optional data file
/// against it and writes the normalized schema back out when asked to.
pub fn run(config: Config) -> anyhow::Result<Form> {
    config.logging.init()?;

    tracing::info!("🔧 Loading form schema {}", config.form.schema_path.display());

    let schema = form_schema::read_schema(&config.form.schema_path)
        .with_context(|| format!("reading {}", config.form.schema_path.display()))?;
    form_schema::validate_structure(&schema)?;

    let mut form = Form::new(builtin_form_fields(), config.factory_options());
    form.import_schema(&schema)
        .with_context(|| format!("importing {}", config.form.schema_path.display()))?;

    for field in form.fields().iter() {
        let path = form.value_path(&field.id).unwrap_or_default();
        tracing::debug!("{} <{}> -> '{}'", field.id, field.field_type, path.join("."));
    }

    if let Some(data_path) = &config.form.data_path {
        let raw = fs::read_to_string(data_path)
            .with_context(|| format!("reading {}", data_path.display()))?;
        let input: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", data_path.display()))?;
        let initial = data::initial_data(&form, &input);
        tracing::info!("initial data: {}", initial);
    }

    if let Some(export_path) = &config.form.export_path {
        if let Some(schema) = form.export_schema() {
            form_schema::write_schema(export_path, &schema)
                .with_context(|| format!("writing {}", export_path.display()))?;
            tracing::info!("📄 Wrote normalized schema to {}", export_path.display());
        }
    }

    tracing::info!("✅ Form ready with {} fields", form.fields().len());
    Ok(form)
}
