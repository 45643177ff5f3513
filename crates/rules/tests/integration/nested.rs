use nebula_rules::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

#[test]
fn iterator_reports_only_failing_record() {
    let mut each = ValidatorIterator::new()
        .with_rules(rules! { "a" => "required" })
        .with_json(json!([{"a": 1}, {"a": ""}]));

    assert!(!each.is_valid().unwrap());
    assert!(each.error(0).is_none());
    insta::assert_json_snapshot!(each.errors(), @r#"
    {
      "1": {
        "a": {
          "required": "The a field is required."
        }
      }
    }
    "#);
}

#[test]
fn nested_structures_nest_errors() {
    let mut validator = Validator::new()
        .with_rules(rules! {
            "name" => "required",
            "address" => Validator::new().with_rules(rules! {
                "city" => "required",
                "zip" => "required|size:5",
            }),
            "lines" => ValidatorIterator::new().with_rules(rules! {
                "sku" => "required|alpha_num",
                "qty" => "to_int|min:1",
            }),
        })
        .with_json(json!({
            "name": "Ada",
            "address": {"city": "London", "zip": "123"},
            "lines": [
                {"sku": "A1", "qty": "2"},
                {"sku": "B-2", "qty": "0"},
            ],
        }));

    assert!(!validator.is_valid().unwrap());
    insta::assert_json_snapshot!(validator.errors(), @r#"
    {
      "address": {
        "zip": {
          "size": "The zip must be 5."
        }
      },
      "lines": {
        "1": {
          "sku": {
            "alpha_num": "The sku may only contain letters and numbers."
          },
          "qty": {
            "min": "The qty must be at least 1."
          }
        }
      }
    }
    "#);
    assert_eq!(
        validator.key_input_errors(),
        vec!["address[zip]", "lines[1][sku]", "lines[1][qty]"]
    );

    // casts inside records are written back
    let lines = validator.raw_inputs()["lines"].as_array().unwrap();
    assert_eq!(lines[0].as_object().unwrap()["qty"], Value::Integer(2));
}

#[test]
fn iterator_accepts_keyed_records() {
    let mut validator = Validator::new()
        .with_rules(rules! {
            "users" => ValidatorIterator::new().with_rules(rules! { "email" => "email" }),
        })
        .with_json(json!({
            "users": {"ada": {"email": "ada@example.com"}, "bob": {"email": "bob"}},
        }));

    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_input_errors(), vec!["users[bob][email]"]);
}

#[test]
fn iterator_on_scalar_is_an_array_error() {
    let mut validator = Validator::new()
        .with_rules(rules! {
            "lines" => ValidatorIterator::new().with_rules(rules! { "sku" => "required" }),
        })
        .with_json(json!({"lines": 7}));

    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_errors()["lines"], "The lines must be an array.");
}

#[test]
fn nested_validator_on_missing_object_reports_inner_fields() {
    let mut validator = Validator::new().with_rules(rules! {
        "address" => Validator::new().with_rules(rules! { "city" => "required" }),
    });

    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_input_errors(), vec!["address[city]"]);
    assert!(!validator.raw_inputs().contains_key("address"));
}

#[test]
fn nested_runners_inherit_global_and_config() {
    #[derive(Debug, Default)]
    struct Upper;

    impl Rule for Upper {
        fn execute(&self, cx: &mut RuleContext<'_>) {
            let holds = cx
                .value()
                .as_str()
                .is_some_and(|s| s.chars().all(|c| !c.is_lowercase()));
            cx.expect(holds, "The :attribute must be upper case.", "The :attribute must not be upper case.");
        }
    }

    let mut global = RuleSet::new();
    global.register_rule::<Upper>("upper_case");

    let mut validator = Validator::new()
        .with_global(Arc::new(global))
        .with_config(Arc::new(json!({"code_len": 3})))
        .with_rules(rules! {
            "items" => ValidatorIterator::new().with_rules(rules! {
                "code" => "upper_case|size:#code_len",
            }),
        })
        .with_json(json!({"items": [{"code": "ABC"}, {"code": "abcd"}]}));

    assert!(!validator.is_valid().unwrap());
    let errors = validator.errors().get_path(["items", "1", "code"]).unwrap();
    let bag = errors.as_leaf().unwrap();
    assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["upper_case", "size"]);
}
