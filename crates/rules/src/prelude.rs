//! Convenient re-exports of the types most callers need.
//!
//! ```
//! use nebula_rules::prelude::*;
//! ```

pub use crate::book::{BookEntry, RuleBook};
pub use crate::dsl::{Argument, ConfigSource};
pub use crate::foundation::{
    ErrorBag, ErrorNode, ErrorTree, InMemoryFile, Inputs, RuleError, RuleResult, UploadStatus,
    UploadedFile, Value,
};
pub use crate::registry::RuleSet;
pub use crate::rule::{Rule, RuleCall, RuleContext, RuleKind};
pub use crate::runner::{RuleEntry, RuleMap, Validator, ValidatorIterator};
pub use crate::{inputs, rules};
