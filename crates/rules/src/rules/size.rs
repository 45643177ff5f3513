//! Size rules
//!
//! `min`, `max`, `between` and `size` compare the canonical size of a value
//! (see [`crate::size`]) against comparators parsed at hydration time. A
//! malformed comparator is a configuration error; a value without a size is
//! a field error that stops the chain.

use crate::dsl::Argument;
use crate::foundation::{RuleError, RuleResult, Value};
use crate::rule::{Rule, RuleCall, RuleContext};
use crate::size::{comparator_from_value, format_size, parse_comparator};

/// Parses one comparator from a resolved argument.
fn comparator(call: &RuleCall<'_>) -> RuleResult<f64> {
    match call.argument {
        Argument::None => Err(RuleError::missing_argument(call.name)),
        Argument::Literal(token) => parse_comparator(token),
        Argument::Value(value) => comparator_from_value(call.name, value),
    }
}

// ============================================================================
// MIN / MAX / SIZE
// ============================================================================

/// `min:n`: the size must be at least `n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min {
    min: f64,
}

impl Rule for Min {
    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        self.min = comparator(call)?;
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let Some(size) = cx.size_or_fail() else {
            return;
        };
        cx.param("min", format_size(self.min));
        cx.expect(
            size >= self.min,
            "The :attribute must be at least :min.",
            "The :attribute must be less than :min.",
        );
    }
}

/// `max:n`: the size must be at most `n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max {
    max: f64,
}

impl Rule for Max {
    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        self.max = comparator(call)?;
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let Some(size) = cx.size_or_fail() else {
            return;
        };
        cx.param("max", format_size(self.max));
        cx.expect(
            size <= self.max,
            "The :attribute may not be greater than :max.",
            "The :attribute must be greater than :max.",
        );
    }
}

/// `size:n`: the size must equal `n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Size {
    size: f64,
}

impl Rule for Size {
    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        self.size = comparator(call)?;
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let Some(size) = cx.size_or_fail() else {
            return;
        };
        cx.param("size", format_size(self.size));
        cx.expect(
            size == self.size,
            "The :attribute must be :size.",
            "The :attribute must not be :size.",
        );
    }
}

// ============================================================================
// BETWEEN
// ============================================================================

/// `between:min,max`: the size must lie in `[min, max]`, both ends inclusive.
///
/// The argument is either `min,max` text or a two-element array. A lower
/// bound above the upper bound is rejected at hydration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Between {
    min: f64,
    max: f64,
}

impl Rule for Between {
    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        if call.argument.is_none() {
            return Err(RuleError::missing_argument(call.name));
        }

        let bounds = call.argument.items();
        let [min, max] = bounds.as_slice() else {
            return Err(RuleError::invalid_argument(
                call.name,
                "two comma-separated bounds",
                call.argument.display(),
            ));
        };
        let (min, max) = (bound(call.name, min)?, bound(call.name, max)?);

        if min > max {
            return Err(RuleError::InvertedBounds {
                rule: call.name.to_owned(),
                min: format_size(min),
                max: format_size(max),
            });
        }

        self.min = min;
        self.max = max;
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let Some(size) = cx.size_or_fail() else {
            return;
        };
        cx.param("min", format_size(self.min));
        cx.param("max", format_size(self.max));
        cx.expect(
            (self.min..=self.max).contains(&size),
            "The :attribute must be between :min and :max.",
            "The :attribute must not be between :min and :max.",
        );
    }
}

fn bound(rule: &str, value: &Value) -> RuleResult<f64> {
    match value {
        Value::Text(token) => parse_comparator(token.trim()),
        other => comparator_from_value(rule, other),
    }
}
