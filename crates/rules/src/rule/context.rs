use super::Propagation;
use crate::dsl::Argument;
use crate::foundation::{Inputs, Value};
use crate::size::{UnsupportedSize, get_size};
use smallvec::SmallVec;
use std::borrow::Cow;

/// A failure recorded by a rule, rendered into a message afterwards.
#[derive(Debug, Clone)]
pub(crate) struct Failure {
    pub(crate) code: Cow<'static, str>,
    pub(crate) template: Cow<'static, str>,
}

/// What a running rule sees and reports through.
///
/// Holds the current value of the field, the resolved argument and the
/// direction of the clause. Failures, message parameters and propagation
/// requests recorded here are collected by [`super::RuleInstance`].
#[derive(Debug)]
pub struct RuleContext<'a> {
    field: &'a str,
    rule: &'a str,
    negated: bool,
    argument: &'a Argument,
    inputs: Option<&'a Inputs>,
    value: Value,
    pub(crate) failures: SmallVec<[Failure; 1]>,
    pub(crate) params: SmallVec<[(Cow<'static, str>, String); 4]>,
    pub(crate) propagation: Propagation,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for one execution.
    pub fn new(
        field: &'a str,
        rule: &'a str,
        negated: bool,
        argument: &'a Argument,
        value: Value,
    ) -> Self {
        Self {
            field,
            rule,
            negated,
            argument,
            inputs: None,
            value,
            failures: SmallVec::new(),
            params: SmallVec::new(),
            propagation: Propagation::Continue,
        }
    }

    /// Exposes the full input map to the rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_inputs(mut self, inputs: &'a Inputs) -> Self {
        self.inputs = Some(inputs);
        self
    }

    /// Field the rule runs on.
    pub fn field(&self) -> &str {
        self.field
    }

    /// Rule name as written in the spec.
    pub fn rule(&self) -> &str {
        self.rule
    }

    /// True if the clause was written `!rule`.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Resolved argument.
    pub fn argument(&self) -> &Argument {
        self.argument
    }

    /// Current value, after any earlier filters.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Full input map, for rules that declared [`super::Rule::needs_context`].
    pub fn inputs(&self) -> Option<&'a Inputs> {
        self.inputs
    }

    /// Looks up a sibling field. Always `None` without context.
    pub fn input(&self, key: &str) -> Option<&'a Value> {
        self.inputs.and_then(|inputs| inputs.get(key))
    }

    /// Replaces the current value. Meant for filters.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    /// Takes the current value out, leaving null behind.
    pub fn take_value(&mut self) -> Value {
        std::mem::take(&mut self.value)
    }

    pub(crate) fn into_value(self) -> Value {
        self.value
    }

    /// Adds a message placeholder value, e.g. `:min`.
    pub fn param(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> &mut Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Records a failure under the rule's own name.
    pub fn fail(&mut self, template: impl Into<Cow<'static, str>>) {
        let code = Cow::Owned(self.rule.to_owned());
        self.fail_with_code(code, template);
    }

    /// Records a failure under an explicit error code.
    pub fn fail_with_code(
        &mut self,
        code: impl Into<Cow<'static, str>>,
        template: impl Into<Cow<'static, str>>,
    ) {
        self.failures.push(Failure {
            code: code.into(),
            template: template.into(),
        });
    }

    /// Applies the clause direction to a test result.
    ///
    /// `holds` is the outcome of the positive test. In the `rule` direction a
    /// false outcome fails with `must`; in the `!rule` direction a true
    /// outcome fails with `not`. Returns whether the clause passed.
    pub fn expect(
        &mut self,
        holds: bool,
        must: impl Into<Cow<'static, str>>,
        not: impl Into<Cow<'static, str>>,
    ) -> bool {
        match (self.negated, holds) {
            (false, true) | (true, false) => true,
            (false, false) => {
                self.fail(must);
                false
            }
            (true, true) => {
                self.fail(not);
                false
            }
        }
    }

    /// Returns the size of the current value, or reports a `size_type`
    /// failure and stops the chain when the value has none.
    pub fn size_or_fail(&mut self) -> Option<f64> {
        match get_size(&self.value) {
            Ok(size) => Some(size),
            Err(UnsupportedSize { kind }) => {
                self.param("type", kind.name());
                self.fail_with_code(
                    "size_type",
                    "The :attribute has an unsupported type (:type) for a size comparison.",
                );
                self.stop_propagation();
                None
            }
        }
    }

    /// Skips the remaining rules of the chain; errors are kept.
    pub fn stop_propagation(&mut self) {
        self.propagation = self.propagation.max(Propagation::Stop);
    }

    /// Skips the remaining rules and discards the field's errors.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation = Propagation::StopImmediate;
    }

    /// Current propagation request.
    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    /// True if the rule recorded any failure so far.
    pub fn has_failed(&self) -> bool {
        !self.failures.is_empty()
    }
}
