//! Custom rules and the three registry tiers.

use nebula_rules::prelude::*;
use nebula_rules::registry::{RuleRegistry, RuleTier};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

/// `divisible_by:n`, a predicate with an argument.
#[derive(Debug, Default)]
struct DivisibleBy {
    divisor: i64,
}

impl Rule for DivisibleBy {
    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        let text = call
            .argument
            .text()
            .ok_or_else(|| RuleError::missing_argument(call.name))?;
        self.divisor = text
            .parse::<i64>()
            .ok()
            .filter(|divisor| *divisor != 0)
            .ok_or_else(|| RuleError::invalid_argument(call.name, "a non-zero integer", text))?;
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let holds = matches!(cx.value(), Value::Integer(n) if n % self.divisor == 0);
        cx.param("divisor", self.divisor.to_string());
        cx.expect(
            holds,
            "The :attribute must be divisible by :divisor.",
            "The :attribute must not be divisible by :divisor.",
        );
    }
}

/// `after:field`, reading a sibling through the context capability.
#[derive(Debug, Default)]
struct After {
    other: String,
}

impl Rule for After {
    fn needs_context(&self) -> bool {
        true
    }

    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        self.other = call
            .argument
            .text()
            .ok_or_else(|| RuleError::missing_argument(call.name))?;
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let start = cx.input(&self.other).and_then(Value::as_f64);
        let holds = match (cx.value().as_f64(), start) {
            (Some(end), Some(start)) => end > start,
            _ => false,
        };
        cx.param("other", self.other.clone());
        cx.expect(holds, "The :attribute must come after :other.", "The :attribute must not come after :other.");
    }
}

/// Rewrites every `required` failure to a constant message; used to prove shadowing.
#[derive(Debug, Default)]
struct Shout;

impl Rule for Shout {
    fn execute(&self, cx: &mut RuleContext<'_>) {
        if cx.value().is_blank() {
            cx.fail("SHOUT");
        }
    }
}

#[test]
fn instance_rule_with_argument() {
    let mut validator = Validator::new()
        .with_rule_type::<DivisibleBy>("divisible_by")
        .with_rules(rules! { "n" => "divisible_by:3", "m" => "!divisible_by:3" })
        .with_json(json!({"n": 10, "m": 9}));

    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_errors()["n"], "The n must be divisible by 3.");
    assert_eq!(validator.key_errors()["m"], "The m must not be divisible by 3.");
}

#[test]
fn hydrate_errors_surface_from_is_valid() {
    let mut validator = Validator::new()
        .with_rule_type::<DivisibleBy>("divisible_by")
        .with_rules(rules! { "n" => "divisible_by:0" });

    assert_eq!(
        validator.is_valid().unwrap_err(),
        RuleError::InvalidArgument {
            rule: "divisible_by".into(),
            expected: "a non-zero integer".into(),
            actual: "0".into(),
        }
    );
}

#[test]
fn context_rules_see_sibling_inputs() {
    let mut validator = Validator::new()
        .with_rule("after", || Box::new(After::default()))
        .with_rules(rules! { "end" => "after:start" })
        .with_json(json!({"start": 10, "end": 5}));

    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_errors()["end"], "The end must come after start.");
}

#[test]
fn tiers_resolve_instance_then_global_then_builtin() {
    let mut global = RuleSet::new();
    global.register_rule::<Shout>("required");
    let global = Arc::new(global);

    let mut local = RuleSet::new();
    local.register_rule::<DivisibleBy>("required");

    let registry = RuleRegistry::new(&local, Some(&*global));
    assert_eq!(registry.tier_of("required"), Some(RuleTier::Instance));
    let empty = RuleSet::new();
    let registry = RuleRegistry::new(&empty, Some(&*global));
    assert_eq!(registry.tier_of("required"), Some(RuleTier::Global));
    assert_eq!(registry.tier_of("min"), Some(RuleTier::Builtin));

    let mut validator = Validator::new()
        .with_global(Arc::clone(&global))
        .with_rules(rules! { "name" => "required" });
    assert!(!validator.is_valid().unwrap());
    assert_eq!(validator.key_errors()["name"], "SHOUT");
}

#[test]
fn global_tier_is_shared_between_validators() {
    let mut global = RuleSet::new();
    global.register_rule::<DivisibleBy>("divisible_by");
    let global = Arc::new(global);

    for (value, expected) in [(6, true), (7, false)] {
        let mut validator = Validator::new()
            .with_global(Arc::clone(&global))
            .with_rules(rules! { "n" => "divisible_by:2" })
            .with_inputs(inputs! { "n" => value });
        assert_eq!(validator.is_valid().unwrap(), expected);
    }
}
