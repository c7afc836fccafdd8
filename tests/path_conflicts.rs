use formwork::core::{FactoryOptions, FieldError, FieldFactory, FormContext, KeySource};
use formwork::models::definitions::builtin_form_fields;
use formwork::models::field::FieldAttrs;

/// Hands out a fixed sequence of suffixes.
#[derive(Debug)]
struct Scripted(Vec<&'static str>);

impl KeySource for Scripted {
    fn next_suffix(&mut self, _len: usize) -> String {
        if self.0.len() > 1 {
            self.0.remove(0).to_string()
        } else {
            self.0.first().copied().unwrap_or("x").to_string()
        }
    }
}

fn factory() -> FieldFactory {
    FieldFactory::new(builtin_form_fields(), FactoryOptions::default())
}

fn with_root(factory: &mut FieldFactory) -> FormContext {
    let mut ctx = FormContext::new();
    factory
        .create(&mut ctx, FieldAttrs::new("default").with_id("Form"), true)
        .expect("root");
    ctx
}

fn segments(path: &str) -> Vec<String> {
    path.split('.').map(String::from).collect()
}

#[test]
fn generated_child_gets_prefixed_id_and_random_key() {
    let mut factory = factory();
    let mut ctx = with_root(&mut factory);

    assert_eq!(ctx.value_path("Form"), Some(vec![]));

    let field = factory
        .create(&mut ctx, FieldAttrs::new("text").with_parent("Form"), true)
        .unwrap()
        .clone();

    let number = field.id.strip_prefix("Field_").expect("Field_ prefix");
    assert!(!number.is_empty() && number.chars().all(|c| c.is_ascii_digit()));

    let key = field.key.clone().expect("key assigned");
    let suffix = key.strip_prefix("text_").expect("text_ prefix");
    assert!(!suffix.is_empty());
    assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));

    assert_eq!(ctx.value_path(&field.id), Some(vec![key]));
}

#[test]
fn dotted_keys_collide_wherever_they_resolve() {
    let mut factory = factory();
    let mut ctx = with_root(&mut factory);

    let first = factory
        .create(
            &mut ctx,
            FieldAttrs::new("text").with_key("a.b").with_parent("Form"),
            true,
        )
        .unwrap()
        .id
        .clone();
    assert_eq!(ctx.value_path(&first), Some(segments("a.b")));

    // a pathed group at "a" puts "b" at the very same location
    let group = factory
        .create(
            &mut ctx,
            FieldAttrs::new("group").with_path("a").with_parent("Form"),
            true,
        );
    assert_eq!(group.unwrap_err(), FieldError::PathConflict("a".into()));

    let loose = factory
        .create(&mut ctx, FieldAttrs::new("group").with_parent("Form"), true)
        .unwrap()
        .id
        .clone();
    let before = ctx.clone();
    let err = factory
        .create(
            &mut ctx,
            FieldAttrs::new("number").with_key("a.b").with_parent(loose.as_str()),
            true,
        )
        .unwrap_err();

    assert_eq!(err, FieldError::PathConflict("a.b".into()));
    assert_eq!(ctx, before);
}

#[test]
fn keyed_children_nest_under_pathed_container() {
    let mut factory = factory();
    let mut ctx = with_root(&mut factory);

    let address = factory
        .create(
            &mut ctx,
            FieldAttrs::new("group").with_path("address").with_parent("Form"),
            true,
        )
        .unwrap()
        .id
        .clone();
    let city = factory
        .create(
            &mut ctx,
            FieldAttrs::new("text").with_key("city").with_parent(address.as_str()),
            true,
        )
        .unwrap()
        .id
        .clone();

    assert_eq!(ctx.value_path(&city), Some(segments("address.city")));

    // nothing may bind a scalar over the container
    let err = factory
        .create(
            &mut ctx,
            FieldAttrs::new("text").with_key("address").with_parent("Form"),
            true,
        )
        .unwrap_err();
    assert_eq!(err, FieldError::PathConflict("address".into()));
}

#[test]
fn explicit_ids_are_unique() {
    let mut factory = factory();
    let mut ctx = with_root(&mut factory);

    factory
        .create(
            &mut ctx,
            FieldAttrs::new("text").with_id("X").with_parent("Form"),
            true,
        )
        .unwrap();
    let err = factory
        .create(
            &mut ctx,
            FieldAttrs::new("text").with_id("X").with_parent("Form"),
            true,
        )
        .unwrap_err();

    assert_eq!(err, FieldError::DuplicateId("X".into()));
    assert_eq!(
        ctx.fields().iter().filter(|f| f.id == "X").count(),
        1
    );
}

#[test]
fn second_root_is_rejected() {
    let mut factory = factory();
    let mut ctx = with_root(&mut factory);

    let err = factory
        .create(&mut ctx, FieldAttrs::new("default"), true)
        .unwrap_err();
    assert_eq!(err, FieldError::PathConflict(String::new()));
    assert_eq!(ctx.fields().len(), 1);
}

#[test]
fn random_keys_redraw_on_sibling_collision() {
    let mut factory = factory().with_key_source(Scripted(vec!["aaaaa", "aaaaa", "bbbbb"]));
    let mut ctx = with_root(&mut factory);

    let first = factory
        .create(&mut ctx, FieldAttrs::new("text").with_parent("Form"), true)
        .unwrap()
        .key
        .clone();
    let second = factory
        .create(&mut ctx, FieldAttrs::new("text").with_parent("Form"), true)
        .unwrap()
        .key
        .clone();

    assert_eq!(first.as_deref(), Some("text_aaaaa"));
    assert_eq!(second.as_deref(), Some("text_bbbbb"));
}
