//! Comparison rules

use crate::foundation::{RuleError, RuleResult, Value};
use crate::rule::message::humanize;
use crate::rule::{Rule, RuleCall, RuleContext};

/// Loose scalar equality: equal values, or scalars with the same text form.
fn loosely_equal(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    match (left.to_text(), right.to_text()) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

// ============================================================================
// SAME
// ============================================================================

/// `same:@other`: the value must equal another field's value.
///
/// Any argument form works (`same:literal` compares against the text), but
/// the message names the referenced field only for `@` references.
#[derive(Debug, Clone, Default)]
pub struct Same {
    expected: Value,
    other: String,
}

impl Rule for Same {
    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        if call.argument.is_none() {
            return Err(RuleError::missing_argument(call.name));
        }
        self.expected = call.argument.to_value();
        self.other = match call.raw.and_then(|raw| raw.strip_prefix('@')) {
            Some(field) => humanize(field).into_owned(),
            None => call.argument.display(),
        };
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let holds = loosely_equal(cx.value(), &self.expected);
        cx.param("other", self.other.clone());
        cx.expect(
            holds,
            "The :attribute and :other must match.",
            "The :attribute and :other must be different.",
        );
    }
}

// ============================================================================
// IN
// ============================================================================

/// `in:a,b,c`: the value must be one of the listed items.
///
/// An array value passes only if every element is listed.
#[derive(Debug, Clone, Default)]
pub struct In {
    allowed: Vec<Value>,
}

impl In {
    fn allows(&self, value: &Value) -> bool {
        self.allowed
            .iter()
            .any(|allowed| loosely_equal(value, allowed))
    }
}

impl Rule for In {
    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        if call.argument.is_none() {
            return Err(RuleError::missing_argument(call.name));
        }
        self.allowed = call.argument.items();
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let holds = match cx.value() {
            Value::Array(items) => items.iter().all(|item| self.allows(item)),
            value => self.allows(value),
        };
        let values = self
            .allowed
            .iter()
            .filter_map(Value::to_text)
            .collect::<Vec<_>>()
            .join(", ");
        cx.param("values", values);
        cx.expect(
            holds,
            "The selected :attribute is invalid.",
            "The :attribute must not be one of: :values.",
        );
    }
}
