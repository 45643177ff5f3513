use super::chain::run_records;
use super::settings::{Settings, settings_methods};
use super::{RuleEntry, RuleMap};
use crate::foundation::{ErrorNode, ErrorTree, Inputs, RuleResult, Value};
use indexmap::IndexMap;
use tracing::debug;

/// Applies one rule map to every record of a list.
///
/// Errors are keyed by record index, then by field:
/// `{ "1": { "a": { "required": ".." } } }`. Records without errors do not
/// appear.
///
/// Nested inside a [`super::Validator`] it validates the list held by a
/// field; used on its own it validates the records handed to it.
///
/// # Examples
///
/// ```
/// use nebula_rules::prelude::*;
///
/// let mut each = ValidatorIterator::new()
///     .with_rules(rules! { "a" => "required" })
///     .with_records([inputs! { "a" => 1 }, inputs! { "a" => "" }]);
///
/// assert!(!each.is_valid()?);
/// assert_eq!(each.key_input_errors(), vec!["1[a]"]);
/// # Ok::<(), RuleError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidatorIterator {
    records: Vec<Inputs>,
    pub(super) rules: RuleMap,
    pub(super) settings: Settings,
    errors: ErrorTree,
}

impl ValidatorIterator {
    /// Creates an iterator with no rules and no records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the records.
    pub fn set_records(&mut self, records: impl IntoIterator<Item = Inputs>) -> &mut Self {
        self.records = records.into_iter().collect();
        self
    }

    /// Builder form of [`Self::set_records`].
    #[must_use = "builder methods must be chained or built"]
    pub fn with_records(mut self, records: impl IntoIterator<Item = Inputs>) -> Self {
        self.set_records(records);
        self
    }

    /// Replaces the records with the elements of a JSON array.
    ///
    /// Elements that are not objects become empty records.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_json(mut self, json: serde_json::Value) -> Self {
        self.records = match json {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(crate::foundation::inputs_from_json)
                .collect(),
            _ => Vec::new(),
        };
        self
    }

    /// Appends one record.
    pub fn add_record(&mut self, record: Inputs) -> &mut Self {
        self.records.push(record);
        self
    }

    /// Replaces the per-record rule map.
    pub fn set_rules(&mut self, rules: RuleMap) -> &mut Self {
        self.rules = rules;
        self
    }

    /// Builder form of [`Self::set_rules`].
    #[must_use = "builder methods must be chained or built"]
    pub fn with_rules(mut self, rules: RuleMap) -> Self {
        self.set_rules(rules);
        self
    }

    /// Adds or replaces the entry of one record field.
    pub fn add_rule(&mut self, field: impl Into<String>, entry: impl Into<RuleEntry>) -> &mut Self {
        self.rules.insert(field.into(), entry.into());
        self
    }

    settings_methods!();

    /// Validates every record and rebuilds the error tree.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error met; the error tree is left
    /// empty in that case.
    pub fn is_valid(&mut self) -> RuleResult<bool> {
        self.errors = ErrorTree::new();

        let env = self.settings.env(None);
        let errors = run_records(&env, &self.rules, &mut self.records)?;
        self.errors = errors;

        debug!(
            records = self.records.len(),
            failing = self.errors.len(),
            "record validation finished"
        );
        Ok(self.errors.is_empty())
    }

    /// Error tree of the last pass, keyed by record index.
    #[must_use]
    pub fn errors(&self) -> &ErrorTree {
        &self.errors
    }

    /// Errors of one record.
    #[must_use]
    pub fn error(&self, index: usize) -> Option<&ErrorNode> {
        self.errors.get(&index.to_string())
    }

    /// Flattened `index[field] -> first message` view of the errors.
    #[must_use]
    pub fn key_errors(&self) -> IndexMap<String, String> {
        self.errors.flatten()
    }

    /// Flattened paths of every failing field.
    #[must_use]
    pub fn key_input_errors(&self) -> Vec<String> {
        self.errors.failing_paths()
    }

    /// Records after the last pass, with filtered values written back.
    #[must_use]
    pub fn records(&self) -> &[Inputs] {
        &self.records
    }

    /// Records as a JSON-like list value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(self.records.iter().cloned().map(Value::Object).collect())
    }
}
