//! Macros for building rule maps and input maps inline.
//!
//! # Available Macros
//!
//! - [`rules!`] builds an ordered [`RuleMap`](crate::runner::RuleMap)
//! - [`inputs!`] builds an [`Inputs`](crate::foundation::Inputs) map
//!
//! # Examples
//!
//! ```
//! use nebula_rules::prelude::*;
//!
//! let address = Validator::new().with_rules(rules! { "city" => "required" });
//! let map = rules! {
//!     "name" => "required|trim",
//!     "address" => address,
//! };
//! assert_eq!(map.len(), 2);
//!
//! let inputs = inputs! { "name" => "ada", "age" => 36 };
//! assert_eq!(inputs["age"], Value::Integer(36));
//! ```

// ============================================================================
// RULES MACRO
// ============================================================================

/// Builds a [`RuleMap`](crate::runner::RuleMap) in declaration order.
///
/// Each value is anything convertible into a
/// [`RuleEntry`](crate::runner::RuleEntry): a spec string, a
/// [`Validator`](crate::runner::Validator) or a
/// [`ValidatorIterator`](crate::runner::ValidatorIterator).
#[macro_export]
macro_rules! rules {
    () => {
        $crate::runner::RuleMap::new()
    };
    ($($field:expr => $entry:expr),+ $(,)?) => {{
        let mut map = $crate::runner::RuleMap::new();
        $(
            map.insert(
                ::std::string::String::from($field),
                $crate::runner::RuleEntry::from($entry),
            );
        )+
        map
    }};
}

// ============================================================================
// INPUTS MACRO
// ============================================================================

/// Builds an [`Inputs`](crate::foundation::Inputs) map from values
/// convertible into [`Value`](crate::foundation::Value).
#[macro_export]
macro_rules! inputs {
    () => {
        $crate::foundation::Inputs::new()
    };
    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::foundation::Inputs::new();
        $(
            map.insert(
                ::std::string::String::from($field),
                $crate::foundation::Value::from($value),
            );
        )+
        map
    }};
}
