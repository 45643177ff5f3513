//! # nebula-rules
//!
//! A rule engine for validating and filtering keyed input maps, driven by a
//! compact string DSL.
//!
//! ## Quick Start
//!
//! ```
//! use nebula_rules::prelude::*;
//!
//! let mut validator = Validator::new()
//!     .with_rules(rules! {
//!         "username" => "required|trim|between:3,20|alpha_num",
//!         "password" => "required|min:8",
//!         "confirm"  => "required|same:@password",
//!     })
//!     .with_inputs(inputs! {
//!         "username" => "  ada ",
//!         "password" => "correct horse",
//!         "confirm"  => "correct horse",
//!     });
//!
//! assert!(validator.is_valid()?);
//! assert_eq!(validator.raw_inputs()["username"], Value::from("ada"));
//! # Ok::<(), RuleError>(())
//! ```
//!
//! ## The DSL
//!
//! A field's spec is a `|`-separated chain of clauses `[!]name[:argument]`.
//! The argument is everything after the first colon. Arguments starting with
//! `@` read a sibling field, `#` reads the configured
//! [`ConfigSource`](dsl::ConfigSource), and `\@` / `\#` escape those prefixes.
//!
//! ## Two kinds of errors
//!
//! - **Validation errors** are data. They land in the
//!   [`ErrorTree`](foundation::ErrorTree) and make `is_valid()` return
//!   `Ok(false)`.
//! - **Configuration errors** ([`RuleError`](foundation::RuleError)) are bugs
//!   in the rule specification: unknown rules, malformed comparators, inverted
//!   bounds, `@field` references to missing fields. `is_valid()` returns them
//!   as `Err` and stops.
//!
//! ## Custom rules
//!
//! Implement [`Rule`](rule::Rule) and register it on a validator
//! ([`Validator::with_rule`](runner::Validator::with_rule)) or on a shared
//! global [`RuleSet`](registry::RuleSet).
//!
//! ## Logging
//!
//! The engine emits `tracing` events (`debug` per pass and per cut chain,
//! `trace` per rule) and never installs a subscriber.

#[macro_use]
mod macros;

pub mod book;
pub mod dsl;
pub mod foundation;
pub mod prelude;
pub mod registry;
pub mod rule;
pub mod rules;
pub mod runner;
pub mod size;
