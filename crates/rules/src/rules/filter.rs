//! Filters
//!
//! Filters rewrite the value for the rest of the chain and never fail.
//! Values a filter does not understand pass through untouched, and
//! negation has no effect on them.

use crate::foundation::Value;
use crate::rule::{Rule, RuleContext, RuleKind};
use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z!][^>]*>").expect("tag pattern is valid"));

/// Declares a unit filter whose transformation maps the current value.
///
/// The body returns `Some(new_value)` to replace the value or `None` to keep it.
macro_rules! filter {
    (
        $(#[$meta:meta])*
        $name:ident,
        |$value:ident| $body:expr $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Rule for $name {
            fn kind(&self) -> RuleKind {
                RuleKind::Filter
            }

            fn execute(&self, cx: &mut RuleContext<'_>) {
                let $value = cx.value();
                let replaced: Option<Value> = $body;
                if let Some(value) = replaced {
                    cx.set_value(value);
                }
            }
        }
    };
}

filter! {
    /// `trim`: strips leading and trailing whitespace from text.
    Trim,
    |value| value.as_str().map(|s| Value::from(s.trim())),
}

filter! {
    /// `lower`: lowercases text.
    Lower,
    |value| value.as_str().map(|s| Value::from(s.to_lowercase())),
}

filter! {
    /// `upper`: uppercases text.
    Upper,
    |value| value.as_str().map(|s| Value::from(s.to_uppercase())),
}

filter! {
    /// `strip_tags`: removes HTML tags and comments from text.
    StripTags,
    |value| value
        .as_str()
        .map(|s| Value::from(TAG_REGEX.replace_all(s, "").into_owned())),
}

filter! {
    /// `to_bool`: casts to a boolean.
    ///
    /// Text `1`, `true`, `on`, `yes` (any case) is true; `0`, `false`, `off`,
    /// `no` and blank text is false. Numbers are true when non-zero; null is
    /// false. Anything else is left as is.
    ToBool,
    |value| match value {
        Value::Null => Some(Value::Bool(false)),
        Value::Bool(_) => None,
        Value::Integer(n) => Some(Value::Bool(*n != 0)),
        Value::Float(n) => Some(Value::Bool(*n != 0.0)),
        Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(Value::Bool(true)),
            "" | "0" | "false" | "off" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Array(_) | Value::Object(_) | Value::File(_) => None,
    },
}

filter! {
    /// `to_int`: casts integral text, floats and booleans to an integer.
    ///
    /// Floats truncate toward zero. Text that is not an integer is left as is.
    ToInt,
    |value| match value {
        Value::Text(s) => s.trim().parse::<i64>().ok().map(Value::Integer),
        Value::Float(n) if n.is_finite() => Some(Value::Integer(n.trunc() as i64)),
        Value::Bool(b) => Some(Value::Integer(i64::from(*b))),
        _ => None,
    },
}
