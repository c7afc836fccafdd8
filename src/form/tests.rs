#![cfg(test)]

use super::Form;
use crate::core::error::FieldError;
use crate::models::field::FieldAttrs;
use form_schema::schema_from_value;
use serde_json::{json, Value};

fn form(schema: Value) -> Form {
    let mut form = Form::with_builtin_fields();
    form.import_schema(&schema_from_value(schema).expect("valid schema"))
        .expect("import");
    form
}

fn path(form: &Form, id: &str) -> String {
    form.value_path(id).expect("field exists").join(".")
}

fn address_form() -> Form {
    form(json!({
        "id": "Form_1",
        "type": "default",
        "components": [
            { "id": "name", "type": "text", "key": "name" },
            {
                "id": "address",
                "type": "group",
                "path": "address",
                "components": [
                    { "id": "city", "type": "text", "key": "city" },
                    { "id": "zip", "type": "text", "key": "zip" }
                ]
            },
            { "id": "notes", "type": "group", "components": [] }
        ]
    }))
}

#[test]
fn import_resolves_paths_and_keeps_order() {
    let form = address_form();

    assert_eq!(form.root().unwrap().id, "Form_1");
    assert_eq!(path(&form, "Form_1"), "");
    assert_eq!(path(&form, "city"), "address.city");
    assert_eq!(path(&form, "notes"), "");
    assert_eq!(
        form.get("address").unwrap().children(),
        &["city".to_string(), "zip".to_string()]
    );
    assert_eq!(form.fields().len(), 6);
}

#[test]
fn failed_import_keeps_previous_form() {
    let mut form = address_form();
    let before = form.context().clone();

    let conflicting = schema_from_value(json!({
        "type": "default",
        "components": [
            { "type": "text", "key": "a" },
            { "type": "text", "key": "a" }
        ]
    }))
    .unwrap();

    let err = form.import_schema(&conflicting).unwrap_err();
    assert_eq!(err, FieldError::PathConflict("a".into()));
    assert_eq!(form.context(), &before);
    assert_eq!(form.root().unwrap().id, "Form_1");
}

#[test]
fn import_requires_default_root() {
    let mut form = Form::with_builtin_fields();
    let err = form
        .import_schema(&schema_from_value(json!({ "type": "group" })).unwrap())
        .unwrap_err();
    assert!(matches!(err, FieldError::InvalidSchema(_)));
    assert!(form.root().is_none());
}

#[test]
fn export_mirrors_the_tree() {
    let form = address_form();
    let schema = form.export_schema().unwrap();
    let value = serde_json::to_value(&schema).unwrap();

    assert_eq!(value["components"][1]["path"], "address");
    assert_eq!(value["components"][1]["components"][1]["key"], "zip");
    assert_eq!(value["components"][2]["components"], json!([]));
    assert!(value["components"][0].get("_parent").is_none());
}

#[test]
fn add_field_inserts_at_index_with_defaults() {
    let mut form = address_form();

    let id = form
        .add_field(FieldAttrs::new("checkbox").with_key("agree"), "Form_1", Some(0))
        .unwrap();

    let root = form.root().unwrap();
    assert_eq!(root.children()[0], id);
    assert_eq!(form.get(&id).unwrap().property_str("label"), Some("Checkbox"));
    assert_eq!(path(&form, &id), "agree");

    let err = form
        .add_field(FieldAttrs::new("text").with_key("city"), "address", None)
        .unwrap_err();
    assert_eq!(err, FieldError::PathConflict("address.city".into()));
}

#[test]
fn remove_field_releases_subtree() {
    let mut form = address_form();

    let removed = form.remove_field("address").unwrap();
    assert_eq!(removed.id, "address");
    assert!(form.get("city").is_none());
    assert!(!form.fields().ids().assigned("zip"));
    assert_eq!(form.root().unwrap().children().len(), 2);

    // path is free again
    form.add_field(FieldAttrs::new("text").with_key("address"), "Form_1", None)
        .unwrap();

    assert!(matches!(
        form.remove_field("Form_1"),
        Err(FieldError::InvalidEdit(_))
    ));
    assert_eq!(
        form.remove_field("missing").unwrap_err(),
        FieldError::FieldNotFound("missing".into())
    );
}

#[test]
fn rekey_is_atomic_and_self_compatible() {
    let mut form = address_form();

    // renaming to the same key never conflicts with itself
    form.edit_field("name", "key", json!("name")).unwrap();

    form.edit_field("name", "key", json!("person.name")).unwrap();
    assert_eq!(path(&form, "name"), "person.name");
    assert!(!form.paths().is_claimed(&["name".to_string()]));

    let before = form.context().clone();
    let err = form.edit_field("zip", "key", json!("city")).unwrap_err();
    assert_eq!(err, FieldError::PathConflict("address.city".into()));
    assert_eq!(form.context(), &before);

    assert!(matches!(
        form.edit_field("zip", "key", json!("")),
        Err(FieldError::InvalidEdit(_))
    ));
}

#[test]
fn repath_moves_descendant_claims() {
    let mut form = address_form();

    form.edit_field("address", "path", json!("home.address")).unwrap();
    assert_eq!(path(&form, "city"), "home.address.city");
    assert!(form.paths().can_claim_path(&["address".into(), "city".into()], true));

    // dropping the path lifts children to the parent's level
    form.edit_field("address", "path", Value::Null).unwrap();
    assert_eq!(path(&form, "zip"), "zip");
    assert!(form.paths().claims_of("address").is_empty());

    // children of a pathless group share their parent's namespace
    form.edit_field("name", "key", json!("street")).unwrap();
    form.add_field(FieldAttrs::new("text").with_key("street"), "address", None)
        .unwrap_err();
}

#[test]
fn repath_rejected_when_children_collide() {
    let mut form = address_form();
    let other = form
        .add_field(FieldAttrs::new("group").with_path("home"), "Form_1", None)
        .unwrap();
    form.add_field(FieldAttrs::new("text").with_key("city"), &other, None)
        .unwrap();

    let before = form.context().clone();
    let err = form.edit_field("address", "path", json!("home")).unwrap_err();
    assert_eq!(err, FieldError::PathConflict("home.city".into()));
    assert_eq!(form.context(), &before);
    assert_eq!(path(&form, "city"), "address.city");

    // two groups may share a path as long as their leaves differ
    form.edit_field("city", "key", json!("town")).unwrap();
    form.edit_field("address", "path", json!("home")).unwrap();
    assert_eq!(path(&form, "city"), "home.town");
    assert_eq!(form.paths().claims_at(&["home".to_string()]).len(), 2);
}

#[test]
fn update_id_follows_references() {
    let mut form = address_form();

    form.edit_field("address", "id", json!("Group_home")).unwrap();

    assert!(form.get("address").is_none());
    assert_eq!(form.get("city").unwrap().parent.as_deref(), Some("Group_home"));
    assert_eq!(form.root().unwrap().children()[1], "Group_home");
    assert_eq!(form.paths().claims_of("Group_home").len(), 1);
    assert!(form.fields().ids().assigned("Group_home"));
    assert!(!form.fields().ids().assigned("address"));

    assert_eq!(
        form.edit_field("city", "id", json!("zip")).unwrap_err(),
        FieldError::DuplicateId("zip".into())
    );
}

#[test]
fn plain_properties_and_structural_guards() {
    let mut form = address_form();

    form.edit_field("name", "label", json!("Full name")).unwrap();
    assert_eq!(form.get("name").unwrap().property_str("label"), Some("Full name"));

    form.edit_field("name", "label", Value::Null).unwrap();
    assert!(form.get("name").unwrap().property("label").is_none());

    assert!(matches!(
        form.edit_field("name", "type", json!("number")),
        Err(FieldError::InvalidEdit(_))
    ));
}
