//! Chain flow: ordering, stop, stop-immediate and filters.

use nebula_rules::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn validate(spec: &str, value: serde_json::Value) -> Validator {
    let mut validator = Validator::new()
        .with_rules(rules! { "field" => spec })
        .with_json(json!({ "field": value }));
    validator.is_valid().expect("valid configuration");
    validator
}

fn codes(validator: &Validator) -> Vec<String> {
    validator
        .error("field")
        .and_then(ErrorNode::as_leaf)
        .map(|bag| bag.keys().cloned().collect())
        .unwrap_or_default()
}

#[rstest]
#[case::type_guard_stops("array|min:2", json!("abc"), &["array"])]
#[case::type_guard_passes("array|min:2", json!([1]), &["min"])]
#[case::required_stops("required|min:3|email", json!(""), &["required"])]
#[case::soft_failures_accumulate("min:5|email", json!("ab"), &["min", "email"])]
#[case::optional_blank_is_skipped("!required|min:3", json!(""), &[])]
#[case::optional_blank_drops_earlier_errors("email|!required|min:3", json!(" "), &[])]
#[case::optional_present_is_checked("!required|min:3", json!("ab"), &["min"])]
#[case::size_type_error_stops("min:1|email", json!(true), &["size_type"])]
fn chain_outcomes(#[case] spec: &str, #[case] value: serde_json::Value, #[case] expected: &[&str]) {
    assert_eq!(codes(&validate(spec, value)), expected);
}

#[test]
fn absent_field_is_null() {
    let mut validator = Validator::new().with_rules(rules! { "missing" => "required" });
    assert!(!validator.is_valid().unwrap());

    let mut validator = Validator::new().with_rules(rules! { "missing" => "!required|email" });
    assert!(validator.is_valid().unwrap());
}

#[test]
fn filters_apply_in_order() {
    let validator = validate("strip_tags|trim|upper", json!("  <i>hello</i> "));
    assert_eq!(validator.raw_inputs()["field"], Value::from("HELLO"));
}

#[test]
fn filter_result_feeds_later_rules_only() {
    // min runs before trim and sees the padded text
    let validator = validate("min:4|trim|max:3", json!(" ab "));
    assert!(validator.errors().is_empty());

    let validator = validate("trim|min:4", json!(" ab "));
    assert_eq!(codes(&validator), vec!["min"]);
}

#[test]
fn numeric_text_needs_casting_for_numeric_bounds() {
    assert_eq!(codes(&validate("min:18", json!("17"))), vec!["min"]);
    assert_eq!(codes(&validate("to_int|min:18", json!("17"))), vec!["min"]);
    assert!(codes(&validate("to_int|min:18", json!("21"))).is_empty());
}

#[test]
fn negated_required_with_condition_demands_absence() {
    let mut validator = Validator::new()
        .with_rules(rules! { "coupon" => "!required_with:gift_card" })
        .with_json(json!({"gift_card": "GC-1", "coupon": "SAVE10"}));
    assert!(!validator.is_valid().unwrap());
    assert_eq!(
        validator.key_errors()["coupon"],
        "The coupon field must be empty when gift_card is present."
    );
}

#[test]
fn errors_are_rebuilt_not_accumulated() {
    let mut validator = Validator::new()
        .with_rules(rules! { "name" => "required|min:3" })
        .with_json(json!({"name": "ab"}));

    assert!(!validator.is_valid().unwrap());
    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.errors().error_count(), 1);

    validator.add_input("name", "abc");
    assert!(validator.is_valid().unwrap());
}
