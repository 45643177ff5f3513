//! The rule-spec DSL
//!
//! A field's rules are written as a compact string such as
//! `"required|trim|between:3,20|!same:@username"`. Parsing turns it into an
//! ordered list of [`RuleInvocation`]s; each invocation's raw argument is
//! later tokenized and resolved into an [`Argument`].

pub mod argument;
pub mod spec;

pub use argument::{Argument, ArgumentResolver, ArgumentToken, ConfigSource};
pub use spec::{RuleInvocation, parse, parse_clauses};
