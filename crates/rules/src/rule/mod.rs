//! The rule contract
//!
//! Every rule, built-in or custom, implements [`Rule`]. A rule is created
//! fresh for each invocation, receives its resolved argument once through
//! [`Rule::hydrate`] and then runs once through [`Rule::execute`].
//!
//! Rules come in two kinds:
//!
//! - **Predicates** pass or fail. They must handle both directions
//!   explicitly: [`RuleContext::is_negated`] tells them whether the clause was
//!   written `rule` or `!rule`, and each direction carries its own message.
//! - **Filters** never fail; they rewrite the value seen by the rest of the
//!   chain (and written back into the inputs).
//!
//! Chain flow is controlled from inside a rule with
//! [`RuleContext::stop_propagation`] (skip later rules, keep errors) and
//! [`RuleContext::stop_immediate_propagation`] (skip later rules and drop
//! every error the field collected in this pass).
//!
//! # Examples
//!
//! ```
//! use nebula_rules::rule::{Rule, RuleContext};
//!
//! #[derive(Debug, Default)]
//! struct Even;
//!
//! impl Rule for Even {
//!     fn execute(&self, cx: &mut RuleContext<'_>) {
//!         let holds = matches!(cx.value().as_f64(), Some(n) if n % 2.0 == 0.0);
//!         cx.expect(holds, "The :attribute must be even.", "The :attribute must be odd.");
//!     }
//! }
//! ```

mod context;
mod instance;
pub mod message;

pub use context::RuleContext;
pub use instance::RuleInstance;
pub use message::{AttributeTransformer, MessageScope, Messages};

use crate::dsl::Argument;
use crate::foundation::RuleResult;
use std::fmt;

/// Whether a rule tests or transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleKind {
    /// Passes or fails; never changes the value.
    #[default]
    Predicate,
    /// Rewrites the value; never fails.
    Filter,
}

/// Chain control requested by a rule.
///
/// Ordered by strength: a rule can only escalate, never relax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Propagation {
    /// Run the next rule.
    #[default]
    Continue,
    /// Skip the remaining rules; keep the errors.
    Stop,
    /// Skip the remaining rules and discard this field's errors.
    StopImmediate,
}

/// Static facts about an invocation, handed to [`Rule::hydrate`].
#[derive(Debug, Clone, Copy)]
pub struct RuleCall<'a> {
    /// Rule name as written in the spec.
    pub name: &'a str,
    /// Field the rule is attached to.
    pub field: &'a str,
    /// Resolved argument.
    pub argument: &'a Argument,
    /// Argument text as written, before resolution.
    pub raw: Option<&'a str>,
    /// Clause was written with `!`.
    pub negated: bool,
}

/// A predicate or filter applied to one field's value.
pub trait Rule: fmt::Debug + Send {
    /// Predicate or filter. Defaults to predicate.
    fn kind(&self) -> RuleKind {
        RuleKind::Predicate
    }

    /// Whether the rule reads sibling fields through [`RuleContext::inputs`].
    ///
    /// Rules that return `false` see `None` there.
    fn needs_context(&self) -> bool {
        false
    }

    /// Checks and stores the resolved argument.
    ///
    /// Called once, before [`Rule::execute`]. A malformed argument is a
    /// configuration error and must be returned, not reported as a failure.
    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        let _ = call;
        Ok(())
    }

    /// Tests or transforms the current value.
    fn execute(&self, cx: &mut RuleContext<'_>);
}

/// Returns the argument as text or fails with [`crate::foundation::RuleError::MissingArgument`].
pub(crate) fn required_text(call: &RuleCall<'_>) -> RuleResult<String> {
    call.argument
        .text()
        .ok_or_else(|| crate::foundation::RuleError::missing_argument(call.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propagation_escalates() {
        assert!(Propagation::StopImmediate > Propagation::Stop);
        assert!(Propagation::Stop > Propagation::Continue);
        assert_eq!(Propagation::default(), Propagation::Continue);
    }
}
