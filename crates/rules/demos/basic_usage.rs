//! Basic usage example for nebula-rules
//!
//! Run with `RUST_LOG=nebula_rules=debug` to see each clause as it executes.

use nebula_rules::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), RuleError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut validator = Validator::new()
        .with_rules(rules! {
            "name" => "trim|required|min:3",
            "email" => "required|email",
            "age" => "!required|to_int|between:18,120",
            "role" => "in:admin,editor,viewer",
            "password" => "required|min:8",
            "password_confirmation" => "same:@password",
        })
        .with_labels([("password_confirmation", "password confirmation")])
        .with_json(json!({
            "name": "  Al ",
            "email": "al@example",
            "age": "42",
            "role": "root",
            "password": "hunter22",
            "password_confirmation": "hunter23",
        }));

    if validator.is_valid()? {
        println!("✓ all inputs are valid");
    } else {
        println!("✗ validation failed:");
        for (field, message) in validator.key_errors() {
            println!("   {field}: {message}");
        }
    }

    // filters write back into the inputs
    println!("\nfiltered name: {:?}", validator.raw_inputs()["name"]);
    println!("cast age:      {:?}", validator.raw_inputs()["age"]);

    println!("\nerror tree:\n{:#}", validator.errors().to_json());
    Ok(())
}
