//! Configuration errors
//!
//! A [`RuleError`] means the rule specification itself is wrong: an unknown
//! rule name, a malformed comparator, inverted bounds, a reference to a field
//! that does not exist. These are programming mistakes, not bad user input,
//! so they abort the validation pass instead of landing in the error tree.

/// An error in a rule specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RuleError {
    /// The rule name is not present in any registry tier.
    #[error("unknown rule '{rule}' on field '{field}'")]
    UnknownRule { field: String, rule: String },

    /// An `@field` argument references a field missing from the inputs.
    #[error("rule '{rule}' on field '{field}' references missing field '{reference}'")]
    MissingField {
        field: String,
        rule: String,
        reference: String,
    },

    /// A size comparator literal could not be parsed.
    #[error("malformed comparator '{token}': expected a number or <digits><unit>")]
    ArgumentFormat { token: String },

    /// A range rule received a lower bound greater than its upper bound.
    #[error("rule '{rule}' has inverted bounds: {min} > {max}")]
    InvertedBounds { rule: String, min: String, max: String },

    /// The rule requires an argument but none was given.
    #[error("rule '{rule}' requires an argument")]
    MissingArgument { rule: String },

    /// The argument has the wrong shape for this rule.
    #[error("rule '{rule}' expects {expected}, got '{actual}'")]
    InvalidArgument {
        rule: String,
        expected: String,
        actual: String,
    },

    /// A `regex` argument failed to compile.
    #[error("rule '{rule}' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        reason: String,
    },
}

impl RuleError {
    /// Creates an [`RuleError::InvalidArgument`].
    pub fn invalid_argument(
        rule: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            rule: rule.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a [`RuleError::MissingArgument`].
    pub fn missing_argument(rule: impl Into<String>) -> Self {
        Self::MissingArgument { rule: rule.into() }
    }
}

/// Result alias for operations that can hit a configuration error.
pub type RuleResult<T> = Result<T, RuleError>;
