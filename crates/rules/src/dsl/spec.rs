//! Rule spec parsing
//!
//! ```text
//! spec   := clause ("|" clause)*
//! clause := ["!"] name [":" argument]
//! ```
//!
//! The argument is everything after the first colon, so `date_format:H:i:s`
//! carries the argument `H:i:s`. Whitespace around clauses and names is
//! ignored and empty clauses (`"required||min:3"`) are skipped.

use crate::foundation::RuleError;
use crate::registry::RuleRegistry;

/// One clause of a rule spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleInvocation {
    /// Registered rule name.
    pub name: String,
    /// Clause was prefixed with `!`.
    pub negated: bool,
    /// Text after the first colon, unresolved.
    pub raw_argument: Option<String>,
}

impl RuleInvocation {
    /// Creates an invocation without an argument.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            negated: false,
            raw_argument: None,
        }
    }

    /// Sets the raw argument.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_argument(mut self, raw: impl Into<String>) -> Self {
        self.raw_argument = Some(raw.into());
        self
    }

    /// Marks the invocation as negated.
    #[must_use = "builder methods must be chained or built"]
    pub fn negated(mut self) -> Self {
        self.negated = true;
        self
    }

    /// Parses a single clause. Returns `None` for a blank clause.
    #[must_use]
    pub fn parse_clause(clause: &str) -> Option<Self> {
        let clause = clause.trim();
        if clause.is_empty() {
            return None;
        }

        let (negated, body) = match clause.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, clause),
        };
        let (name, raw_argument) = match body.split_once(':') {
            Some((name, argument)) => (name, Some(argument.to_owned())),
            None => (body, None),
        };

        Some(Self {
            name: name.trim().to_owned(),
            negated,
            raw_argument,
        })
    }
}

/// Splits a spec into clauses without checking rule names.
#[must_use]
pub fn parse_clauses(spec: &str) -> Vec<RuleInvocation> {
    spec.split('|')
        .filter_map(RuleInvocation::parse_clause)
        .collect()
}

/// Parses the spec of `field`, checking every name against the registry.
///
/// # Errors
///
/// Returns [`RuleError::UnknownRule`] for the first name no tier knows.
///
/// # Examples
///
/// ```
/// use nebula_rules::dsl::parse;
/// use nebula_rules::registry::{RuleRegistry, RuleSet};
///
/// let local = RuleSet::new();
/// let registry = RuleRegistry::new(&local, None);
///
/// let chain = parse("age", "required|!min:18", &registry).unwrap();
/// assert_eq!(chain.len(), 2);
/// assert!(chain[1].negated);
/// assert!(parse("age", "requird", &registry).is_err());
/// ```
pub fn parse(
    field: &str,
    spec: &str,
    registry: &RuleRegistry<'_>,
) -> Result<Vec<RuleInvocation>, RuleError> {
    let invocations = parse_clauses(spec);
    if let Some(unknown) = invocations.iter().find(|inv| !registry.contains(&inv.name)) {
        return Err(RuleError::UnknownRule {
            field: field.to_owned(),
            rule: unknown.name.clone(),
        });
    }
    Ok(invocations)
}
