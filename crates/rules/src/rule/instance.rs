use super::context::Failure;
use super::message::{self, MessageScope};
use super::{Propagation, Rule, RuleCall, RuleContext, RuleKind};
use crate::dsl::Argument;
use crate::foundation::{ErrorBag, Inputs, RuleResult, Value};
use std::borrow::Cow;
use std::fmt;
use tracing::warn;

/// A hydrated rule bound to one field, plus the bookkeeping every rule shares.
///
/// The instance owns the value the rule produced, the rendered error bag and
/// the propagation request. The runner reads those back after
/// [`RuleInstance::execute`].
///
/// # Examples
///
/// ```
/// use nebula_rules::dsl::Argument;
/// use nebula_rules::foundation::{Inputs, Value};
/// use nebula_rules::registry::{RuleRegistry, RuleSet};
/// use nebula_rules::rule::RuleInstance;
///
/// let local = RuleSet::new();
/// let registry = RuleRegistry::new(&local, None);
/// let rule = registry.create("min").unwrap();
///
/// let mut min = RuleInstance::hydrate(rule, "min", "name", Argument::Literal("3".into()), Some("3"), false)?;
/// min.execute(Value::from("ab"), &Inputs::new());
/// assert!(min.has_errors());
/// assert_eq!(min.errors()["min"], "The name must be at least 3.");
/// # Ok::<(), nebula_rules::foundation::RuleError>(())
/// ```
pub struct RuleInstance<'a> {
    name: String,
    field: String,
    negated: bool,
    argument: Argument,
    rule: Box<dyn Rule>,
    scope: MessageScope<'a>,
    value: Value,
    errors: ErrorBag,
    propagation: Propagation,
}

impl<'a> RuleInstance<'a> {
    /// Hands the resolved argument to the rule and binds it to `field`.
    ///
    /// # Errors
    ///
    /// Propagates the configuration error raised by [`Rule::hydrate`].
    pub fn hydrate(
        mut rule: Box<dyn Rule>,
        name: &str,
        field: &str,
        argument: Argument,
        raw: Option<&str>,
        negated: bool,
    ) -> RuleResult<Self> {
        rule.hydrate(&RuleCall {
            name,
            field,
            argument: &argument,
            raw,
            negated,
        })?;

        Ok(Self {
            name: name.to_owned(),
            field: field.to_owned(),
            negated,
            argument,
            rule,
            scope: MessageScope::default(),
            value: Value::Null,
            errors: ErrorBag::new(),
            propagation: Propagation::Continue,
        })
    }

    /// Sets where labels and message overrides come from.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_scope(mut self, scope: MessageScope<'a>) -> Self {
        self.scope = scope;
        self
    }

    /// Runs the rule on `value`.
    ///
    /// `inputs` is only exposed to rules that declare
    /// [`Rule::needs_context`]. Errors and propagation from an earlier run are
    /// replaced.
    pub fn execute(&mut self, value: Value, inputs: &Inputs) -> &mut Self {
        let mut cx = RuleContext::new(&self.field, &self.name, self.negated, &self.argument, value);
        if self.rule.needs_context() {
            cx = cx.with_inputs(inputs);
        }
        self.rule.execute(&mut cx);

        let propagation = cx.propagation;
        let failures = std::mem::take(&mut cx.failures);
        let params = std::mem::take(&mut cx.params);
        self.value = cx.into_value();
        self.propagation = propagation;
        self.errors.clear();

        if self.rule.kind() == RuleKind::Filter {
            if !failures.is_empty() {
                warn!(
                    rule = %self.name,
                    field = %self.field,
                    dropped = failures.len(),
                    "filter reported failures; ignored"
                );
            }
            return self;
        }

        for failure in &failures {
            let message = self.render(failure, &params);
            self.errors.insert(failure.code.to_string(), message);
        }
        self
    }

    fn render(&self, failure: &Failure, params: &[(Cow<'static, str>, String)]) -> String {
        let template =
            self.scope
                .template(&self.field, &failure.code, self.negated, &failure.template);

        message::render(template, |name| {
            let raw = params
                .iter()
                .rev()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .or_else(|| match name {
                    "attribute" => Some(self.scope.label(&self.field)),
                    "value" => self.value.to_text(),
                    _ => None,
                })?;
            Some(self.scope.transform(&self.field, &failure.code, name, raw))
        })
    }

    /// Rule name as written in the spec.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field the rule is bound to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// True for `!rule` clauses.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Resolved argument.
    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    /// Predicate or filter.
    pub fn kind(&self) -> RuleKind {
        self.rule.kind()
    }

    /// True if the last run produced errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors of the last run, keyed by code.
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// Takes the errors of the last run.
    pub fn take_errors(&mut self) -> ErrorBag {
        std::mem::take(&mut self.errors)
    }

    /// Value after the last run.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Takes the value after the last run.
    pub fn take_value(&mut self) -> Value {
        std::mem::take(&mut self.value)
    }

    /// Propagation requested by the last run.
    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    /// True if later rules must not run.
    pub fn is_stop(&self) -> bool {
        self.propagation >= Propagation::Stop
    }

    /// True if later rules must not run and the field's errors are void.
    pub fn is_stop_immediate(&self) -> bool {
        self.propagation == Propagation::StopImmediate
    }
}

impl fmt::Debug for RuleInstance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleInstance")
            .field("name", &self.name)
            .field("field", &self.field)
            .field("negated", &self.negated)
            .field("argument", &self.argument)
            .field("rule", &self.rule)
            .field("errors", &self.errors)
            .field("propagation", &self.propagation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Messages;
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct AtLeastThree;

    impl Rule for AtLeastThree {
        fn execute(&self, cx: &mut RuleContext<'_>) {
            let holds = cx.value().as_str().is_some_and(|s| s.len() >= 3);
            cx.param("min", "3");
            cx.expect(
                holds,
                "The :attribute needs :min characters.",
                "The :attribute needs fewer than :min characters.",
            );
        }
    }

    fn instance<'a>(negated: bool) -> RuleInstance<'a> {
        RuleInstance::hydrate(
            Box::new(AtLeastThree),
            "short",
            "user_name",
            Argument::None,
            None,
            negated,
        )
        .unwrap()
    }

    #[test]
    fn test_default_message_uses_humanized_label() {
        let mut rule = instance(false);
        rule.execute(Value::from("ab"), &Inputs::new());
        assert_eq!(rule.errors()["short"], "The user name needs 3 characters.");
        assert!(!rule.is_stop());
    }

    #[test]
    fn test_negated_direction_has_its_own_message() {
        let mut rule = instance(true);
        rule.execute(Value::from("abcd"), &Inputs::new());
        assert_eq!(
            rule.errors()["short"],
            "The user name needs fewer than 3 characters."
        );
        rule.execute(Value::from("ab"), &Inputs::new());
        assert!(!rule.has_errors());
    }

    #[test]
    fn test_overrides_and_transformers_apply() {
        let mut messages = Messages::new();
        messages.set_label("user_name", "login");
        messages.set_message("user_name.short", ":attribute: :min+ chars");
        messages.set_transformer("short", "min", Arc::new(|v: &str| format!("[{v}]")));

        let mut rule = instance(false).with_scope(MessageScope::new(Some(&messages), None));
        rule.execute(Value::from(""), &Inputs::new());
        assert_eq!(rule.errors()["short"], "login: [3]+ chars");
    }

    #[test]
    fn test_filter_failures_are_dropped() {
        #[derive(Debug, Default)]
        struct Shout;

        impl Rule for Shout {
            fn kind(&self) -> RuleKind {
                RuleKind::Filter
            }

            fn execute(&self, cx: &mut RuleContext<'_>) {
                let loud = cx.value().as_str().map(str::to_uppercase);
                match loud {
                    Some(loud) => cx.set_value(loud),
                    None => cx.fail("The :attribute cannot be shouted."),
                }
            }
        }

        let mut rule =
            RuleInstance::hydrate(Box::new(Shout), "shout", "nick", Argument::None, None, false)
                .unwrap();
        rule.execute(Value::from("hey"), &Inputs::new());
        assert_eq!(rule.value(), &Value::from("HEY"));

        rule.execute(Value::Integer(3), &Inputs::new());
        assert!(!rule.has_errors());
        assert_eq!(rule.value(), &Value::Integer(3));
    }
}
