use formwork::core::FieldError;
use formwork::form::Form;
use formwork::models::field::FieldAttrs;
use serde_json::json;

fn form() -> Form {
    let schema = form_schema::schema_from_value(json!({
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
                    {
                        "id": "geo",
                        "type": "group",
                        "path": "geo",
                        "components": [
                            { "id": "lat", "type": "number", "key": "lat" }
                        ]
                    }
                ]
            },
            {
                "id": "billing",
                "type": "group",
                "path": "billing",
                "components": [
                    { "id": "billing_city", "type": "text", "key": "city" }
                ]
            },
            { "id": "loose", "type": "group", "components": [] }
        ]
    }))
    .expect("valid schema");

    let mut form = Form::with_builtin_fields();
    form.import_schema(&schema).expect("import");
    form
}

fn path(form: &Form, id: &str) -> String {
    form.value_path(id).expect("field exists").join(".")
}

#[test]
fn move_carries_the_subtree_to_the_new_parent() {
    let mut form = form();

    form.move_field("geo", "billing", None).unwrap();

    assert_eq!(path(&form, "geo"), "billing.geo");
    assert_eq!(path(&form, "lat"), "billing.geo.lat");
    assert_eq!(form.get("geo").unwrap().parent.as_deref(), Some("billing"));
    assert_eq!(
        form.get("billing").unwrap().children(),
        &["billing_city".to_string(), "geo".to_string()]
    );
    assert_eq!(form.get("address").unwrap().children(), &["city".to_string()]);

    // the old location is free again
    let lat = ["address", "geo", "lat"].map(String::from);
    assert!(form.paths().can_claim_path(&lat, true));
}

#[test]
fn move_into_pathless_group_keeps_parent_namespace() {
    let mut form = form();

    form.move_field("name", "loose", Some(0)).unwrap();
    assert_eq!(path(&form, "name"), "name");

    form.move_field("city", "loose", Some(0)).unwrap();
    assert_eq!(path(&form, "city"), "city");
    assert_eq!(
        form.get("loose").unwrap().children(),
        &["city".to_string(), "name".to_string()]
    );
}

#[test]
fn move_conflict_leaves_form_untouched() {
    let mut form = form();
    let before = form.context().clone();

    let err = form.move_field("city", "billing", None).unwrap_err();

    assert_eq!(err, FieldError::PathConflict("billing.city".into()));
    assert_eq!(form.context(), &before);
    assert_eq!(path(&form, "city"), "address.city");
}

#[test]
fn reorder_within_same_parent() {
    let mut form = form();

    form.move_field("name", "Form_1", Some(2)).unwrap();

    let order: Vec<&str> = form
        .root()
        .unwrap()
        .children()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(order, vec!["address", "billing", "name", "loose"]);
    assert_eq!(path(&form, "name"), "name");
}

#[test]
fn invalid_moves_are_rejected() {
    let mut form = form();

    assert!(matches!(
        form.move_field("address", "geo", None),
        Err(FieldError::InvalidMove(_))
    ));
    assert!(matches!(
        form.move_field("address", "address", None),
        Err(FieldError::InvalidMove(_))
    ));
    assert!(matches!(
        form.move_field("city", "name", None),
        Err(FieldError::InvalidMove(_))
    ));
    assert!(matches!(
        form.move_field("Form_1", "loose", None),
        Err(FieldError::InvalidMove(_))
    ));
    assert_eq!(
        form.move_field("nowhere", "loose", None).unwrap_err(),
        FieldError::FieldNotFound("nowhere".into())
    );
}

#[test]
fn added_field_can_be_moved_and_removed() {
    let mut form = form();

    let err = form
        .add_field(FieldAttrs::new("textfield").with_key("x"), "loose", None)
        .unwrap_err();
    assert!(matches!(err, FieldError::UnsupportedType { .. }));

    let id = form
        .add_field(FieldAttrs::new("text").with_key("zip"), "loose", None)
        .unwrap();
    form.move_field(&id, "address", Some(0)).unwrap();
    assert_eq!(path(&form, &id), "address.zip");

    form.remove_field("address").unwrap();
    assert!(form.get(&id).is_none());
    assert!(form.paths().claims_of(&id).is_empty());
}
