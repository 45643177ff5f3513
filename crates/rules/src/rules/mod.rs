//! Built-in rules
//!
//! The catalogue shipped in the builtin registry tier:
//!
//! - **presence**: `required`, `required_with`, `required_without`, `required_if`
//! - **size**: `min`, `max`, `between`, `size`
//! - **types**: `string`, `numeric`, `integer`, `boolean`, `array`, `file`
//! - **comparison**: `same`, `in`
//! - **pattern**: `regex`, `alpha`, `alpha_num`, `email`
//! - **filters**: `trim`, `lower`, `upper`, `strip_tags`, `to_bool`, `to_int`
//!
//! Every rule type is public so it can be re-registered under another name
//! in an instance or global tier.

pub mod compare;
pub mod filter;
pub mod pattern;
pub mod presence;
pub mod size;
pub mod types;

pub use compare::{In, Same};
pub use filter::{Lower, StripTags, ToBool, ToInt, Trim, Upper};
pub use pattern::{Alpha, AlphaNum, Email, Pattern};
pub use presence::{Required, RequiredIf, RequiredWith, RequiredWithout};
pub use size::{Between, Max, Min, Size};
pub use types::{IsArray, IsBoolean, IsFile, IsInteger, IsNumeric, IsString};

use crate::registry::RuleSet;

/// Fills `set` with every built-in rule under its canonical name.
pub(crate) fn register_builtin(set: &mut RuleSet) {
    set.register_rule::<Required>("required")
        .register_rule::<RequiredWith>("required_with")
        .register_rule::<RequiredWithout>("required_without")
        .register_rule::<RequiredIf>("required_if")
        .register_rule::<Min>("min")
        .register_rule::<Max>("max")
        .register_rule::<Between>("between")
        .register_rule::<Size>("size")
        .register_rule::<IsString>("string")
        .register_rule::<IsNumeric>("numeric")
        .register_rule::<IsInteger>("integer")
        .register_rule::<IsBoolean>("boolean")
        .register_rule::<IsArray>("array")
        .register_rule::<IsFile>("file")
        .register_rule::<Same>("same")
        .register_rule::<In>("in")
        .register_rule::<Pattern>("regex")
        .register_rule::<Alpha>("alpha")
        .register_rule::<AlphaNum>("alpha_num")
        .register_rule::<Email>("email")
        .register_rule::<Trim>("trim")
        .register_rule::<Lower>("lower")
        .register_rule::<Upper>("upper")
        .register_rule::<StripTags>("strip_tags")
        .register_rule::<ToBool>("to_bool")
        .register_rule::<ToInt>("to_int");
}
