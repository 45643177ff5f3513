use nebula_rules::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

#[test]
fn labels_replace_attribute() {
    let mut validator = Validator::new()
        .with_rules(rules! { "dob" => "required", "first_name" => "required" })
        .with_labels([("dob", "date of birth")]);

    assert!(!validator.is_valid().unwrap());
    let errors = validator.key_errors();
    assert_eq!(errors["dob"], "The date of birth field is required.");
    assert_eq!(errors["first_name"], "The first name field is required.");
}

#[test]
fn field_specific_message_beats_rule_message() {
    let mut validator = Validator::new()
        .with_rules(rules! { "a" => "required", "b" => "required" })
        .with_messages([
            ("required", "Missing :attribute."),
            ("b.required", "B is mandatory."),
        ]);

    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_errors()["a"], "Missing a.");
    assert_eq!(validator.key_errors()["b"], "B is mandatory.");
}

#[test]
fn negated_clauses_use_bang_keys() {
    let mut validator = Validator::new()
        .with_rules(rules! { "role" => "!in:root,admin" })
        .with_messages([("in", "not used"), ("!in", ":attribute ':value' is reserved")])
        .with_json(json!({"role": "root"}));

    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_errors()["role"], "role 'root' is reserved");
}

#[test]
fn global_messages_apply_below_instance_messages() {
    let mut global = RuleSet::new();
    global.register_message("min", "Global: :attribute >= :min");
    let global = Arc::new(global);

    let mut validator = Validator::new()
        .with_global(Arc::clone(&global))
        .with_rules(rules! { "name" => "min:3" })
        .with_json(json!({"name": "ab"}));
    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_errors()["name"], "Global: name >= 3");

    let mut validator = Validator::new()
        .with_global(global)
        .with_messages([("min", "Local")])
        .with_rules(rules! { "name" => "min:3" })
        .with_json(json!({"name": "ab"}));
    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_errors()["name"], "Local");
}

#[test]
fn attribute_transformers_rewrite_placeholders() {
    let mut validator = Validator::new()
        .with_rules(rules! { "avatar" => "max:1kb" })
        .with_attribute_transformer("max", "max", |bytes: &str| {
            let kib = bytes.parse::<f64>().unwrap_or_default() / 1024.0;
            format!("{kib} KiB")
        })
        .with_attribute_transformer("avatar", "attribute", |label: &str| label.to_uppercase())
        .with_inputs(inputs! { "avatar" => InMemoryFile::new(vec![0u8; 4096]) });

    assert!(!validator.is_valid().unwrap());
    assert_eq!(
        validator.key_errors()["avatar"],
        "The AVATAR may not be greater than 1 KiB."
    );
}

#[test]
fn rule_book_carries_labels_and_messages() {
    let book = RuleBook::from_json(json!({
        "rules": {"email": "required|email"},
        "labels": {"email": "e-mail"},
        "messages": {"email.email": "That :attribute looks wrong."},
    }))
    .unwrap();

    let mut validator = book.to_validator().with_json(json!({"email": "bad"}));
    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_errors()["email"], "That e-mail looks wrong.");
}

#[test]
fn nested_runners_inherit_overrides() {
    let mut validator = Validator::new()
        .with_labels([("qty", "quantity"), ("sku", "stock code")])
        .with_messages([("sku.required", "Every line needs a :attribute.")])
        .with_rules(rules! {
            "lines" => ValidatorIterator::new()
                .with_labels([("sku", "SKU")])
                .with_rules(rules! { "sku" => "required", "qty" => "min:1" }),
            "shipping" => Validator::new().with_rules(rules! { "qty" => "required" }),
        })
        .with_json(json!({"lines": [{"qty": 0}]}));

    assert!(!validator.is_valid().unwrap());
    let errors = validator.key_errors();
    assert_eq!(errors["lines[0][sku]"], "Every line needs a SKU.");
    assert_eq!(errors["lines[0][qty]"], "The quantity must be at least 1.");
    assert_eq!(errors["shipping[qty]"], "The quantity field is required.");
}
