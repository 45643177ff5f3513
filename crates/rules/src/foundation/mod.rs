//! Core data types shared by every layer of the engine
//!
//! - **Values**: [`Value`], [`Inputs`], the [`UploadedFile`] capability
//! - **Configuration errors**: [`RuleError`]
//! - **Validation results**: [`ErrorTree`], [`ErrorNode`], [`ErrorBag`]
//!
//! Validation failures and configuration errors never mix: the former are
//! data and end up in an [`ErrorTree`], the latter are returned as `Err` and
//! abort the pass.

pub mod error;
pub mod tree;
pub mod value;

pub use error::{RuleError, RuleResult};
pub use tree::{ErrorBag, ErrorNode, ErrorTree};
pub use value::{
    InMemoryFile, Inputs, UploadStatus, UploadedFile, Value, ValueKind, inputs_from_json,
};
