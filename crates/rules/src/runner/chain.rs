//! Execution of rule maps, field chains and record lists.

use super::settings::Env;
use super::{RuleEntry, RuleMap};
use crate::dsl::{self, ArgumentResolver};
use crate::foundation::{ErrorBag, ErrorTree, Inputs, RuleError, RuleResult, Value};
use crate::rule::{RuleInstance, RuleKind};
use tracing::{debug, trace};

/// Result of one field's chain.
#[derive(Debug)]
pub(crate) struct ChainOutcome {
    pub(crate) errors: ErrorBag,
    pub(crate) value: Value,
    pub(crate) filtered: bool,
}

/// Parses a field's spec and builds every rule it names.
///
/// Argument resolution and construction finish for the whole chain before
/// anything executes, so a malformed spec fails the same way whatever the
/// field's value.
pub(crate) fn build_chain<'a>(
    env: &Env<'a>,
    field: &str,
    spec: &str,
    inputs: &Inputs,
) -> RuleResult<Vec<RuleInstance<'a>>> {
    let registry = env.registry();
    let resolver = ArgumentResolver::new(inputs, env.config);

    dsl::parse(field, spec, &registry)?
        .into_iter()
        .map(|invocation| -> RuleResult<RuleInstance<'a>> {
            let raw = invocation.raw_argument.as_deref();
            let argument = resolver.resolve(field, &invocation.name, raw)?;
            let rule = registry
                .create(&invocation.name)
                .ok_or_else(|| RuleError::UnknownRule {
                    field: field.to_owned(),
                    rule: invocation.name.clone(),
                })?;
            Ok(
                RuleInstance::hydrate(rule, &invocation.name, field, argument, raw, invocation.negated)?
                    .with_scope(env.scope()),
            )
        })
        .collect()
}

/// Runs the rule spec of one field against `inputs`.
///
/// The chain starts from the field's current input (null when absent).
/// Errors of every executed rule are merged; `stop` ends the chain keeping
/// them, `stop_immediate` ends it and drops them all.
pub(crate) fn run_chain(
    env: &Env<'_>,
    field: &str,
    spec: &str,
    inputs: &Inputs,
) -> RuleResult<ChainOutcome> {
    let chain = build_chain(env, field, spec, inputs)?;

    let mut outcome = ChainOutcome {
        errors: ErrorBag::new(),
        value: inputs.get(field).cloned().unwrap_or_default(),
        filtered: false,
    };

    for mut instance in chain {
        instance.execute(std::mem::take(&mut outcome.value), inputs);

        trace!(
            field,
            rule = %instance.name(),
            negated = instance.is_negated(),
            failed = instance.has_errors(),
            propagation = ?instance.propagation(),
            "rule executed"
        );

        outcome.filtered |= instance.kind() == RuleKind::Filter;
        outcome.value = instance.take_value();
        outcome.errors.extend(instance.take_errors());

        if instance.is_stop_immediate() {
            debug!(field, rule = %instance.name(), discarded = outcome.errors.len(), "chain stopped immediately");
            outcome.errors.clear();
            break;
        }
        if instance.is_stop() {
            debug!(field, rule = %instance.name(), "chain stopped");
            break;
        }
    }

    Ok(outcome)
}

/// Validates `inputs` against every entry of `rules`, writing filtered
/// values back.
pub(crate) fn run_rules(env: &Env<'_>, rules: &RuleMap, inputs: &mut Inputs) -> RuleResult<ErrorTree> {
    let mut tree = ErrorTree::new();

    for (field, entry) in rules {
        match entry {
            RuleEntry::Spec(spec) => {
                let outcome = run_chain(env, field, spec, inputs)?;
                if outcome.filtered && (inputs.contains_key(field) || !outcome.value.is_null()) {
                    inputs.insert(field.clone(), outcome.value);
                }
                tree.insert_leaf(field.clone(), outcome.errors);
            }
            RuleEntry::Nested(validator) => {
                let nested_env = validator.settings.env(Some(env));
                let original = inputs.get(field);
                let was_object = matches!(original, Some(Value::Object(_)));
                let was_absent = original.is_none();

                let mut sub = match original {
                    Some(Value::Object(map)) => map.clone(),
                    _ => Inputs::new(),
                };
                let errors = run_rules(&nested_env, &validator.rules, &mut sub)?;

                if was_object || (was_absent && !sub.is_empty()) {
                    inputs.insert(field.clone(), Value::Object(sub));
                }
                tree.insert_tree(field.clone(), errors);
            }
            RuleEntry::Each(iterator) => {
                let nested_env = iterator.settings.env(Some(env));
                let errors = match inputs.get_mut(field) {
                    Some(Value::Array(items)) => Some(run_items(
                        &nested_env,
                        &iterator.rules,
                        items.iter_mut().enumerate(),
                    )?),
                    Some(Value::Object(map)) => {
                        Some(run_items(&nested_env, &iterator.rules, map.iter_mut())?)
                    }
                    _ => None,
                };
                match errors {
                    Some(errors) => tree.insert_tree(field.clone(), errors),
                    None => {
                        // not a list: report it through the `array` rule
                        let outcome = run_chain(env, field, "array", inputs)?;
                        tree.insert_leaf(field.clone(), outcome.errors);
                    }
                }
            }
        }
    }

    Ok(tree)
}

/// Validates each record of a list; object records are updated in place,
/// anything else is validated as an empty record.
fn run_items<'v, K: ToString>(
    env: &Env<'_>,
    rules: &RuleMap,
    items: impl Iterator<Item = (K, &'v mut Value)>,
) -> RuleResult<ErrorTree> {
    let mut tree = ErrorTree::new();
    for (key, item) in items {
        let errors = match item {
            Value::Object(record) => run_rules(env, rules, record)?,
            _ => run_rules(env, rules, &mut Inputs::new())?,
        };
        tree.insert_tree(key.to_string(), errors);
    }
    Ok(tree)
}

/// Validates a list of records held directly by a [`super::ValidatorIterator`].
pub(crate) fn run_records(
    env: &Env<'_>,
    rules: &RuleMap,
    records: &mut [Inputs],
) -> RuleResult<ErrorTree> {
    let mut tree = ErrorTree::new();
    for (index, record) in records.iter_mut().enumerate() {
        let errors = run_rules(env, rules, record)?;
        tree.insert_tree(index.to_string(), errors);
    }
    Ok(tree)
}
