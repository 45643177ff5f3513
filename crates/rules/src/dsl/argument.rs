//! Rule arguments: tokenizing and resolution
//!
//! The raw text after a rule's first colon is tokenized into an
//! [`ArgumentToken`] independently of any inputs, then resolved against the
//! current input map and an optional [`ConfigSource`] into an [`Argument`].
//!
//! | raw            | token                    | resolves to                    |
//! |----------------|--------------------------|--------------------------------|
//! | `@password`    | `FieldRef("password")`   | current value of `password`    |
//! | `#upload.max`  | `ConfigRef("upload.max")`| config value, or null          |
//! | `\@home`       | `Literal("@home")`       | the text `@home`               |
//! | `5,15`         | `Literal("5,15")`        | the text `5,15`                |

use crate::foundation::{Inputs, RuleError, Value};
use indexmap::IndexMap;
use std::collections::HashMap;

// ============================================================================
// TOKENS
// ============================================================================

/// Syntactic form of a raw argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentToken {
    /// Plain text, with any escape already removed.
    Literal(String),
    /// Reference to a sibling field (`@name`).
    FieldRef(String),
    /// Reference to an external config key (`#key`).
    ConfigRef(String),
}

impl ArgumentToken {
    /// Tokenizes a raw argument.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_rules::dsl::ArgumentToken;
    ///
    /// assert_eq!(ArgumentToken::tokenize("@other"), ArgumentToken::FieldRef("other".into()));
    /// assert_eq!(ArgumentToken::tokenize("\\#1"), ArgumentToken::Literal("#1".into()));
    /// ```
    #[must_use]
    pub fn tokenize(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix('@') {
            Self::FieldRef(rest.to_owned())
        } else if let Some(rest) = raw.strip_prefix('#') {
            Self::ConfigRef(rest.to_owned())
        } else if let Some(rest) = raw.strip_prefix("\\@").or_else(|| raw.strip_prefix("\\#")) {
            // keep the sigil, drop the backslash
            Self::Literal(format!("{}{rest}", &raw[1..2]))
        } else {
            Self::Literal(raw.to_owned())
        }
    }
}

// ============================================================================
// RESOLVED ARGUMENT
// ============================================================================

/// A fully resolved rule argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Argument {
    /// The clause had no `:argument` part.
    #[default]
    None,
    /// Literal text from the rule spec.
    Literal(String),
    /// A value pulled from a sibling field or the config source.
    Value(Value),
}

impl Argument {
    /// Returns true if the clause carried no argument.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the argument as text, if it has a scalar form.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Literal(s) => Some(s.clone()),
            Self::Value(value) => value.to_text(),
        }
    }

    /// Returns the argument as a value; literals become text values.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::None => Value::Null,
            Self::Literal(s) => Value::Text(s.clone()),
            Self::Value(value) => value.clone(),
        }
    }

    /// Splits the argument into list items.
    ///
    /// Literals and text values split on commas; array values yield their
    /// elements; other scalars form a one-item list.
    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        match self {
            Self::None | Self::Value(Value::Null) => Vec::new(),
            Self::Literal(s) | Self::Value(Value::Text(s)) => {
                s.split(',').map(|item| Value::Text(item.to_owned())).collect()
            }
            Self::Value(Value::Array(items)) => items.clone(),
            Self::Value(other) => vec![other.clone()],
        }
    }

    /// Renders the argument for a message placeholder.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Value(Value::Array(items)) => items
                .iter()
                .filter_map(Value::to_text)
                .collect::<Vec<_>>()
                .join(", "),
            other => other.text().unwrap_or_default(),
        }
    }
}

// ============================================================================
// CONFIG SOURCE
// ============================================================================

/// External key/value store consulted by `#key` arguments.
pub trait ConfigSource: Send + Sync {
    /// Looks up a key; `None` when absent.
    fn lookup(&self, key: &str) -> Option<Value>;
}

impl ConfigSource for HashMap<String, Value> {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl ConfigSource for IndexMap<String, Value> {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

/// Dotted paths walk nested objects: `#upload.max` reads `{"upload": {"max": ..}}`.
impl ConfigSource for serde_json::Value {
    fn lookup(&self, key: &str) -> Option<Value> {
        key.split('.')
            .try_fold(self, |node, segment| node.get(segment))
            .cloned()
            .map(Value::from)
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves argument tokens against inputs and config.
#[derive(Clone, Copy)]
pub struct ArgumentResolver<'a> {
    inputs: &'a Inputs,
    config: Option<&'a dyn ConfigSource>,
}

impl<'a> ArgumentResolver<'a> {
    /// Creates a resolver over the current input map.
    pub fn new(inputs: &'a Inputs, config: Option<&'a dyn ConfigSource>) -> Self {
        Self { inputs, config }
    }

    /// Resolves the raw argument of `rule` on `field`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MissingField`] when an `@name` reference points at
    /// a key absent from the inputs.
    pub fn resolve(&self, field: &str, rule: &str, raw: Option<&str>) -> Result<Argument, RuleError> {
        let Some(raw) = raw else {
            return Ok(Argument::None);
        };

        match ArgumentToken::tokenize(raw) {
            ArgumentToken::Literal(text) => Ok(Argument::Literal(text)),
            ArgumentToken::FieldRef(name) => match self.inputs.get(&name) {
                Some(value) => Ok(Argument::Value(value.clone())),
                None => Err(RuleError::MissingField {
                    field: field.to_owned(),
                    rule: rule.to_owned(),
                    reference: name,
                }),
            },
            ArgumentToken::ConfigRef(key) => Ok(Argument::Value(
                self.config
                    .and_then(|config| config.lookup(&key))
                    .unwrap_or_default(),
            )),
        }
    }
}

impl std::fmt::Debug for ArgumentResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentResolver")
            .field("inputs", &self.inputs.len())
            .field("config", &self.config.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tokenize_prefixes() {
        assert_eq!(ArgumentToken::tokenize("@pw"), ArgumentToken::FieldRef("pw".into()));
        assert_eq!(ArgumentToken::tokenize("#max"), ArgumentToken::ConfigRef("max".into()));
        assert_eq!(ArgumentToken::tokenize("\\@pw"), ArgumentToken::Literal("@pw".into()));
        assert_eq!(ArgumentToken::tokenize("\\#max"), ArgumentToken::Literal("#max".into()));
        assert_eq!(ArgumentToken::tokenize("a\\@b"), ArgumentToken::Literal("a\\@b".into()));
        assert_eq!(ArgumentToken::tokenize("H:i:s"), ArgumentToken::Literal("H:i:s".into()));
    }

    #[test]
    fn test_resolve_field_reference() {
        let inputs = Inputs::from([("pw".to_owned(), Value::from("secret"))]);
        let resolver = ArgumentResolver::new(&inputs, None);

        let arg = resolver.resolve("confirm", "same", Some("@pw")).unwrap();
        assert_eq!(arg, Argument::Value(Value::from("secret")));

        let err = resolver.resolve("confirm", "same", Some("@nope")).unwrap_err();
        assert_eq!(
            err,
            RuleError::MissingField {
                field: "confirm".into(),
                rule: "same".into(),
                reference: "nope".into(),
            }
        );
    }

    #[test]
    fn test_resolve_config_reference() {
        let inputs = Inputs::new();
        let config = json!({"upload": {"max": "2mb"}});
        let resolver = ArgumentResolver::new(&inputs, Some(&config));

        let arg = resolver.resolve("avatar", "max", Some("#upload.max")).unwrap();
        assert_eq!(arg.text().as_deref(), Some("2mb"));

        let missing = resolver.resolve("avatar", "max", Some("#upload.min")).unwrap();
        assert_eq!(missing, Argument::Value(Value::Null));
    }

    #[test]
    fn test_config_reference_without_source_is_null() {
        let inputs = Inputs::new();
        let resolver = ArgumentResolver::new(&inputs, None);
        assert_eq!(
            resolver.resolve("f", "max", Some("#anything")).unwrap(),
            Argument::Value(Value::Null)
        );
    }

    #[test]
    fn test_items() {
        assert_eq!(
            Argument::Literal("a,b".into()).items(),
            vec![Value::from("a"), Value::from("b")]
        );
        assert_eq!(
            Argument::Value(Value::from(vec![1, 2])).items(),
            vec![Value::Integer(1), Value::Integer(2)]
        );
        assert!(Argument::None.items().is_empty());
    }
}
