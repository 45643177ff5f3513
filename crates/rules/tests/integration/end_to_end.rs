use nebula_rules::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

#[test]
fn required_and_min_report_per_field() {
    let mut validator = Validator::new()
        .with_rules(rules! {
            "name" => "required",
            "age" => "required|min:18",
        })
        .with_json(json!({"name": "", "age": "17"}));

    assert!(!validator.is_valid().unwrap());
    insta::assert_json_snapshot!(validator.errors(), @r#"
    {
      "name": {
        "required": "The name field is required."
      },
      "age": {
        "min": "The age must be at least 18."
      }
    }
    "#);
}

#[test]
fn valid_inputs_produce_empty_tree() {
    let mut validator = Validator::new()
        .with_rules(rules! {
            "name" => "required",
            "age" => "required|to_int|min:18",
        })
        .with_json(json!({"name": "Ada", "age": "36"}));

    assert!(validator.is_valid().unwrap());
    assert!(validator.errors().is_empty());
    assert_eq!(validator.raw_inputs()["age"], Value::Integer(36));
}

#[test]
fn key_views_flatten_paths() {
    let mut validator = Validator::new()
        .with_rules(rules! {
            "email" => "required|email",
            "tags" => "array|min:2",
        })
        .with_json(json!({"email": "nope", "tags": "x"}));

    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_input_errors(), vec!["email", "tags"]);

    let errors = validator.key_errors();
    assert_eq!(errors["email"], "The email must be a valid email address.");
    assert_eq!(errors["tags"], "The tags must be an array.");
}

#[test]
fn configuration_errors_abort_the_pass() {
    let cases = [
        ("x", "required|no_such_rule"),
        ("x", "min:lots"),
        ("x", "between:20,10"),
        ("x", "same:@absent"),
    ];

    for (field, spec) in cases {
        let mut validator = Validator::new()
            .with_rules(rules! { field => spec })
            .with_json(json!({"x": "value"}));
        let err = validator.is_valid().unwrap_err();
        assert!(validator.errors().is_empty(), "{spec}: {err}");
    }
}

#[rstest]
#[case::after_required(
    "required|between:20,10",
    json!({}),
    RuleError::InvertedBounds { rule: "between".into(), min: "20".into(), max: "10".into() }
)]
#[case::after_optional(
    "!required|min:lots",
    json!({"age": ""}),
    RuleError::ArgumentFormat { token: "lots".into() }
)]
#[case::after_type_guard(
    "integer|same:@absent",
    json!({"age": "old"}),
    RuleError::MissingField { field: "age".into(), rule: "same".into(), reference: "absent".into() }
)]
#[case::after_required_reference(
    "required|same:@absent",
    json!({}),
    RuleError::MissingField { field: "age".into(), rule: "same".into(), reference: "absent".into() }
)]
fn configuration_errors_ignore_earlier_stops(
    #[case] spec: &str,
    #[case] inputs: serde_json::Value,
    #[case] expected: RuleError,
) {
    let mut validator = Validator::new()
        .with_rules(rules! { "age" => spec })
        .with_json(inputs);
    assert_eq!(validator.is_valid().unwrap_err(), expected);
}

#[test]
fn iterator_configuration_errors_ignore_record_contents() {
    let mut each = ValidatorIterator::new()
        .with_rules(rules! { "qty" => "required|between:9,1" })
        .with_json(json!([{"qty": ""}, {}]));
    assert!(matches!(
        each.is_valid(),
        Err(RuleError::InvertedBounds { .. })
    ));

    let mut validator = Validator::new()
        .with_rules(rules! {
            "lines" => ValidatorIterator::new().with_rules(rules! { "qty" => "!required|min:lots" }),
        })
        .with_json(json!({"lines": [{"qty": null}]}));
    assert!(matches!(
        validator.is_valid(),
        Err(RuleError::ArgumentFormat { .. })
    ));
}

#[test]
fn unknown_rule_error_names_field_and_rule() {
    let mut validator = Validator::new().with_rules(rules! { "age" => "required|intger" });
    let err = validator.is_valid().unwrap_err();
    assert_eq!(err.to_string(), "unknown rule 'intger' on field 'age'");
}

#[test]
fn config_references_resolve_through_source() {
    let config = json!({"limits": {"bio": 10}});
    let mut validator = Validator::new()
        .with_rules(rules! { "bio" => "max:#limits.bio" })
        .with_config(std::sync::Arc::new(config))
        .with_json(json!({"bio": "far too long for the limit"}));

    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_errors()["bio"], "The bio may not be greater than 10.");
}

#[test]
fn escaped_reference_is_literal() {
    let mut validator = Validator::new()
        .with_rules(rules! { "handle" => "same:\\@admin" })
        .with_json(json!({"handle": "@admin"}));
    assert!(validator.is_valid().unwrap());
}

#[test]
fn input_views_follow_rule_order() {
    let mut validator = Validator::new()
        .with_rules(rules! {
            "b" => "!required",
            "a" => "!required",
            "avatar" => "!required",
        })
        .with_inputs(inputs! {
            "a" => 1,
            "b" => 2,
            "c" => 3,
            "avatar" => InMemoryFile::new(b"gif".to_vec()),
        });
    assert!(validator.is_valid().unwrap());

    let keys = |inputs: Inputs| inputs.keys().cloned().collect::<Vec<_>>();
    assert_eq!(keys(validator.inputs()), vec!["b", "a", "avatar"]);
    assert_eq!(keys(validator.inputs_without(&["a"])), vec!["b", "avatar"]);
    assert_eq!(keys(validator.inputs_without_object(&["b"])), vec!["a"]);
}
