//! Presence rules
//!
//! `required` and its conditional siblings decide whether a field has to be
//! provided at all. "Provided" means not [`Value::is_blank`].
//!
//! When a field is optional and blank, these rules request
//! [`RuleContext::stop_immediate_propagation`]: nothing else in the chain
//! makes sense on a missing value, and no error should survive for it.
//!
//! Under negation the family flips to "must be absent":
//!
//! | clause                 | blank value            | provided value          |
//! |------------------------|------------------------|-------------------------|
//! | `required`             | fail, stop             | pass                    |
//! | `!required`            | stop immediately       | pass                    |
//! | `required_with:a` (a set)  | fail, stop         | pass                    |
//! | `!required_with:a` (a set) | stop immediately   | fail, stop              |
//!
//! When the condition of a conditional rule does not hold, a blank value
//! stops immediately and a provided value passes, in both directions.

use crate::foundation::{RuleError, RuleResult, Value};
use crate::rule::{Rule, RuleCall, RuleContext, required_text};

// ============================================================================
// REQUIRED
// ============================================================================

/// `required`: the value must not be blank.
///
/// `!required` marks the field as optional: a blank value ends the chain and
/// discards the field's errors, a provided value continues through it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Rule for Required {
    fn execute(&self, cx: &mut RuleContext<'_>) {
        if !cx.value().is_blank() {
            return;
        }
        if cx.is_negated() {
            cx.stop_immediate_propagation();
        } else {
            cx.fail("The :attribute field is required.");
            cx.stop_propagation();
        }
    }
}

// ============================================================================
// CONDITIONAL
// ============================================================================

/// Shared tail of the conditional rules once the condition is known.
fn require_when(cx: &mut RuleContext<'_>, condition: bool, must: &'static str, not: &'static str) {
    let blank = cx.value().is_blank();
    match (condition, cx.is_negated(), blank) {
        (true, false, true) => {
            cx.fail(must);
            cx.stop_propagation();
        }
        (true, true, false) => {
            cx.fail(not);
            cx.stop_propagation();
        }
        (_, _, true) => cx.stop_immediate_propagation(),
        _ => {}
    }
}

/// Splits a `a,b,c` argument into trimmed field names.
fn field_list(call: &RuleCall<'_>) -> RuleResult<Vec<String>> {
    let fields: Vec<String> = call
        .argument
        .items()
        .iter()
        .filter_map(Value::to_text)
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .collect();

    if fields.is_empty() {
        return Err(RuleError::missing_argument(call.name));
    }
    Ok(fields)
}

fn is_present(cx: &RuleContext<'_>, field: &str) -> bool {
    cx.input(field).is_some_and(|value| !value.is_blank())
}

/// `required_with:a,b`: required when any of the listed fields is provided.
#[derive(Debug, Clone, Default)]
pub struct RequiredWith {
    fields: Vec<String>,
}

impl Rule for RequiredWith {
    fn needs_context(&self) -> bool {
        true
    }

    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        self.fields = field_list(call)?;
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let condition = self.fields.iter().any(|field| is_present(cx, field));
        cx.param("values", self.fields.join(" / "));
        require_when(
            cx,
            condition,
            "The :attribute field is required when :values is present.",
            "The :attribute field must be empty when :values is present.",
        );
    }
}

/// `required_without:a,b`: required when any of the listed fields is missing.
#[derive(Debug, Clone, Default)]
pub struct RequiredWithout {
    fields: Vec<String>,
}

impl Rule for RequiredWithout {
    fn needs_context(&self) -> bool {
        true
    }

    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        self.fields = field_list(call)?;
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let condition = self.fields.iter().any(|field| !is_present(cx, field));
        cx.param("values", self.fields.join(" / "));
        require_when(
            cx,
            condition,
            "The :attribute field is required when :values is not present.",
            "The :attribute field must be empty when :values is not present.",
        );
    }
}

/// `required_if:other,value`: required when `other` equals `value`.
///
/// The comparison is textual, so `required_if:age,18` matches both `"18"`
/// and `18`.
#[derive(Debug, Clone, Default)]
pub struct RequiredIf {
    other: String,
    expected: String,
}

impl Rule for RequiredIf {
    fn needs_context(&self) -> bool {
        true
    }

    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        let text = required_text(call)?;
        let (other, expected) = text
            .split_once(',')
            .ok_or_else(|| RuleError::invalid_argument(call.name, "'field,value'", &text))?;
        self.other = other.trim().to_owned();
        self.expected = expected.trim().to_owned();
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let condition = cx
            .input(&self.other)
            .and_then(Value::to_text)
            .is_some_and(|actual| actual == self.expected);
        cx.param("other", self.other.clone());
        cx.param("value", self.expected.clone());
        require_when(
            cx,
            condition,
            "The :attribute field is required when :other is :value.",
            "The :attribute field must be empty when :other is :value.",
        );
    }
}
