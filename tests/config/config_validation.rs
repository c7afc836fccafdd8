use formwork::config::{Config, ConfigError};
use formwork::core::FieldError;
use std::fs;
use tempfile::TempDir;

const SCHEMA: &str = r#"{
    "id": "Form_1",
    "type": "default",
    "components": [
        { "type": "text", "key": "name" },
        {
            "type": "group",
            "path": "address",
            "components": [ { "type": "text", "key": "city" } ]
        }
    ]
}"#;

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("formwork.toml");
    fs::write(&path, body).expect("write config");
    path
}

#[test]
fn test_relative_paths_resolve_against_config_dir() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [form]
        schema_path = "form.json"
        export_path = "out/form.json"
    "#,
    );

    let config = Config::load_from_file(&path).expect("valid config");
    assert_eq!(config.form.schema_path, dir.path().join("form.json"));
    assert_eq!(
        config.form.export_path,
        Some(dir.path().join("out/form.json"))
    );
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let result = Config::load_from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Read(_, _))));
}

#[test]
fn test_invalid_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[form\nschema_path = 1");
    assert!(matches!(
        Config::load_from_file(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_run_imports_binds_and_exports() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("form.json"), SCHEMA).unwrap();
    fs::write(
        dir.path().join("data.json"),
        r#"{ "name": "Ada", "address": { "city": "London" } }"#,
    )
    .unwrap();

    let path = write_config(
        &dir,
        r#"
        [form]
        schema_path = "form.json"
        data_path = "data.json"
        export_path = "normalized.json"

        [ids]
        field_prefix = "Input_"
    "#,
    );

    let config = Config::load_from_file(&path).unwrap();
    let form = formwork::run(config).expect("run succeeds");

    assert_eq!(form.fields().len(), 4);
    assert!(form.fields().iter().any(|f| f.id == "Input_1"));

    let exported = form_schema::read_schema(&dir.path().join("normalized.json")).unwrap();
    assert_eq!(exported.id.as_deref(), Some("Form_1"));
    assert_eq!(exported.children()[1].path.as_deref(), Some("address"));
    assert!(exported.children()[1].children()[0].id.is_some());
}

#[test]
fn test_run_reports_conflicting_schema() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("form.json"),
        r#"{ "type": "default", "components": [
            { "type": "text", "key": "a" },
            { "type": "number", "key": "a" }
        ] }"#,
    )
    .unwrap();
    let path = write_config(
        &dir,
        r#"
        [form]
        schema_path = "form.json"
    "#,
    );

    let config = Config::load_from_file(&path).unwrap();
    let err = formwork::run(config).unwrap_err();
    assert_eq!(
        err.downcast_ref::<FieldError>(),
        Some(&FieldError::PathConflict("a".into()))
    );
    assert!(format!("{:#}", err).contains("binding path 'a' is already claimed"));
}
