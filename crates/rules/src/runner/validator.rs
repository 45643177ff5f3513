use super::chain::run_rules;
use super::settings::{Settings, settings_methods};
use super::{RuleEntry, RuleMap};
use crate::foundation::{ErrorNode, ErrorTree, Inputs, RuleResult, Value};
use indexmap::IndexMap;
use tracing::debug;

/// Validates one input map against a rule map.
///
/// # Examples
///
/// ```
/// use nebula_rules::prelude::*;
///
/// let mut validator = Validator::new()
///     .with_rules(rules! {
///         "name" => "required",
///         "age" => "required|to_int|min:18",
///     })
///     .with_inputs(inputs! { "name" => "", "age" => "17" });
///
/// assert!(!validator.is_valid()?);
/// assert_eq!(validator.key_errors()["name"], "The name field is required.");
/// assert_eq!(validator.key_errors()["age"], "The age must be at least 18.");
/// # Ok::<(), RuleError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    inputs: Inputs,
    pub(super) rules: RuleMap,
    pub(super) settings: Settings,
    errors: ErrorTree,
}

impl Validator {
    /// Creates a validator with no rules and no inputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Inputs and rules
    // ------------------------------------------------------------------------

    /// Replaces the input map.
    pub fn set_inputs(&mut self, inputs: impl Into<Inputs>) -> &mut Self {
        self.inputs = inputs.into();
        self
    }

    /// Builder form of [`Self::set_inputs`].
    #[must_use = "builder methods must be chained or built"]
    pub fn with_inputs(mut self, inputs: impl Into<Inputs>) -> Self {
        self.set_inputs(inputs);
        self
    }

    /// Replaces the input map with the fields of a JSON object.
    ///
    /// Anything but an object leaves the validator without inputs.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_json(mut self, json: serde_json::Value) -> Self {
        self.inputs = crate::foundation::inputs_from_json(json);
        self
    }

    /// Sets one input.
    pub fn add_input(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.inputs.insert(field.into(), value.into());
        self
    }

    /// Replaces the rule map.
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

    /// Adds or replaces the entry of one field; new fields go last.
    pub fn add_rule(&mut self, field: impl Into<String>, entry: impl Into<RuleEntry>) -> &mut Self {
        self.rules.insert(field.into(), entry.into());
        self
    }

    settings_methods!();

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Runs every rule and rebuilds the error tree.
    ///
    /// Filtered values are written back into the inputs.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error met (unknown rule, malformed
    /// argument, missing `@field`). The error tree is left empty in that case.
    pub fn is_valid(&mut self) -> RuleResult<bool> {
        self.errors = ErrorTree::new();

        let env = self.settings.env(None);
        let errors = run_rules(&env, &self.rules, &mut self.inputs)?;
        self.errors = errors;

        debug!(
            fields = self.rules.len(),
            failing = self.errors.error_count(),
            "validation pass finished"
        );
        Ok(self.errors.is_empty())
    }

    // ------------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------------

    /// Error tree of the last pass.
    #[must_use]
    pub fn errors(&self) -> &ErrorTree {
        &self.errors
    }

    /// Errors of one top-level field.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<&ErrorNode> {
        self.errors.get(field)
    }

    /// Flattened `path[sub] -> first message` view of the errors.
    #[must_use]
    pub fn key_errors(&self) -> IndexMap<String, String> {
        self.errors.flatten()
    }

    /// Flattened paths of every failing field.
    #[must_use]
    pub fn key_input_errors(&self) -> Vec<String> {
        self.errors.failing_paths()
    }

    /// The full input map, including fields without rules.
    #[must_use]
    pub fn raw_inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Takes the input map out of the validator.
    #[must_use]
    pub fn into_inputs(self) -> Inputs {
        self.inputs
    }

    /// Inputs of the fields that have a rule, in rule order.
    #[must_use]
    pub fn inputs(&self) -> Inputs {
        self.inputs_where(|_, _| true)
    }

    /// Like [`Self::inputs`], without the `excluded` fields.
    #[must_use]
    pub fn inputs_without(&self, excluded: &[&str]) -> Inputs {
        self.inputs_where(|field, _| !excluded.contains(&field))
    }

    /// Like [`Self::inputs_without`], also dropping live object references
    /// such as uploaded files.
    #[must_use]
    pub fn inputs_without_object(&self, excluded: &[&str]) -> Inputs {
        self.inputs_where(|field, value| !excluded.contains(&field) && !value.is_object_ref())
    }

    fn inputs_where(&self, keep: impl Fn(&str, &Value) -> bool) -> Inputs {
        self.rules
            .keys()
            .filter_map(|field| {
                let value = self.inputs.get(field)?;
                keep(field, value).then(|| (field.clone(), value.clone()))
            })
            .collect()
    }
}
