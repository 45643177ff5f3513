//! Type guards
//!
//! Each guard checks the kind of the value and stops the chain when the
//! check fails, so later rules never see a value of the wrong shape:
//! `array|min:2` on a string yields exactly the `array` error.

use crate::foundation::{UploadStatus, Value};
use crate::rule::{Rule, RuleContext};

/// Declares a unit rule struct whose test is a plain function of the value.
macro_rules! type_guard {
    (
        $(#[$meta:meta])*
        $name:ident,
        |$value:ident| $test:expr,
        must: $must:literal,
        not: $not:literal $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Rule for $name {
            fn execute(&self, cx: &mut RuleContext<'_>) {
                let $value = cx.value();
                let holds = $test;
                if !cx.expect(holds, $must, $not) {
                    cx.stop_propagation();
                }
            }
        }
    };
}

type_guard! {
    /// `string`: the value is text.
    IsString,
    |value| matches!(value, Value::Text(_)),
    must: "The :attribute must be a string.",
    not: "The :attribute must not be a string.",
}

type_guard! {
    /// `numeric`: the value is a number, or text holding a finite number.
    IsNumeric,
    |value| match value {
        Value::Integer(_) => true,
        Value::Float(n) => n.is_finite(),
        Value::Text(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    },
    must: "The :attribute must be a number.",
    not: "The :attribute must not be a number.",
}

type_guard! {
    /// `integer`: the value is an integer, an integral float, or text holding one.
    IsInteger,
    |value| match value {
        Value::Integer(_) => true,
        Value::Float(n) => n.is_finite() && n.fract() == 0.0,
        Value::Text(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    },
    must: "The :attribute must be an integer.",
    not: "The :attribute must not be an integer.",
}

type_guard! {
    /// `boolean`: `true`, `false`, `0`, `1`, `"0"`, `"1"`, `"true"` or `"false"`.
    IsBoolean,
    |value| match value {
        Value::Bool(_) => true,
        Value::Integer(n) => *n == 0 || *n == 1,
        Value::Text(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
        _ => false,
    },
    must: "The :attribute field must be true or false.",
    not: "The :attribute field must not be true or false.",
}

type_guard! {
    /// `array`: the value is a list or a map.
    IsArray,
    |value| matches!(value, Value::Array(_) | Value::Object(_)),
    must: "The :attribute must be an array.",
    not: "The :attribute must not be an array.",
}

type_guard! {
    /// `file`: the value is a successfully uploaded file.
    IsFile,
    |value| value.as_file().is_some_and(|file| file.status() == UploadStatus::Ok),
    must: "The :attribute must be a file.",
    not: "The :attribute must not be a file.",
}
