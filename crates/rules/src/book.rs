//! Rule books: rule maps loaded from JSON
//!
//! A rule book describes a whole validator declaratively:
//!
//! ```json
//! {
//!   "rules": {
//!     "name": "required|trim",
//!     "address": { "city": "required" },
//!     "items": [ { "sku": "required" } ]
//!   },
//!   "labels": { "name": "full name" },
//!   "messages": { "name.required": "Tell us your :attribute." }
//! }
//! ```
//!
//! A string is a rule spec, an object is a nested validator and a
//! one-element array holding an object is a record iterator.

use crate::runner::{RuleEntry, RuleMap, Validator, ValidatorIterator};
use indexmap::IndexMap;
use serde::Deserialize;

/// One entry of a rule book.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BookEntry {
    /// A rule spec.
    Spec(String),
    /// Rules of a nested object.
    Nested(IndexMap<String, BookEntry>),
    /// Rules applied to each record of a list.
    Each((IndexMap<String, BookEntry>,)),
}

impl BookEntry {
    fn to_entry(&self) -> RuleEntry {
        match self {
            Self::Spec(spec) => RuleEntry::Spec(spec.clone()),
            Self::Nested(rules) => Validator::new().with_rules(rule_map(rules)).into(),
            Self::Each((rules,)) => ValidatorIterator::new().with_rules(rule_map(rules)).into(),
        }
    }
}

fn rule_map(entries: &IndexMap<String, BookEntry>) -> RuleMap {
    entries
        .iter()
        .map(|(field, entry)| (field.clone(), entry.to_entry()))
        .collect()
}

/// A validator description: rules plus label and message overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleBook {
    /// Field entries, in validation order.
    pub rules: IndexMap<String, BookEntry>,
    /// Field label overrides.
    #[serde(default)]
    pub labels: IndexMap<String, String>,
    /// Message template overrides, keyed like [`Validator::set_messages`].
    #[serde(default)]
    pub messages: IndexMap<String, String>,
}

impl RuleBook {
    /// Parses a rule book from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or an unexpected shape.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Parses a rule book from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for an unexpected shape.
    pub fn from_json(json: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(json)
    }

    /// Builds the rule map described by the book.
    ///
    /// Nested validators and iterators carry no overrides of their own; they
    /// pick up the labels and messages of the runner they end up in.
    #[must_use]
    pub fn rule_map(&self) -> RuleMap {
        rule_map(&self.rules)
    }

    /// Builds a validator with the book's rules, labels and messages.
    #[must_use]
    pub fn to_validator(&self) -> Validator {
        Validator::new()
            .with_rules(self.rule_map())
            .with_labels(self.labels.clone())
            .with_messages(self.messages.clone())
    }
}
