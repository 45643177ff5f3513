//! Validation runners
//!
//! [`Validator`] validates one input map against a [`RuleMap`];
//! [`ValidatorIterator`] applies the same rule map to every record of a list.
//! Either can be nested inside a [`Validator`]'s rule map to validate
//! sub-objects and lists of records, with errors nested one level per depth.
//!
//! Each call to `is_valid` rebuilds the error tree from scratch. Fields run in
//! the declaration order of the rule map, and a field's rules run left to
//! right. Values rewritten by filters are stored back into the inputs, so a
//! later field referencing `@earlier` sees the filtered value. Referencing a
//! field declared later yields its raw input.

mod chain;
mod iterator;
mod settings;
mod validator;

pub use iterator::ValidatorIterator;
pub use validator::Validator;

use indexmap::IndexMap;

/// What to validate a field with.
#[derive(Debug, Clone)]
pub enum RuleEntry {
    /// A rule spec such as `"required|min:3"`.
    Spec(String),
    /// A validator for the object held by the field.
    Nested(Box<Validator>),
    /// A validator applied to each record of the list held by the field.
    Each(Box<ValidatorIterator>),
}

/// Ordered field-to-entry map.
pub type RuleMap = IndexMap<String, RuleEntry>;

impl From<&str> for RuleEntry {
    fn from(spec: &str) -> Self {
        Self::Spec(spec.to_owned())
    }
}

impl From<String> for RuleEntry {
    fn from(spec: String) -> Self {
        Self::Spec(spec)
    }
}

impl From<Validator> for RuleEntry {
    fn from(validator: Validator) -> Self {
        Self::Nested(Box::new(validator))
    }
}

impl From<ValidatorIterator> for RuleEntry {
    fn from(iterator: ValidatorIterator) -> Self {
        Self::Each(Box::new(iterator))
    }
}
