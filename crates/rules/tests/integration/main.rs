//! Integration tests for nebula-rules.

mod end_to_end;
mod flow;
mod messages;
mod nested;
mod registry;
