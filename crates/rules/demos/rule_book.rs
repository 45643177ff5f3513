//! Loading rules, labels and messages from a JSON rule book
//!
//! Nested structures and per-record iteration are declared the same way
//! they are in code: an object for a nested validator, a one-element
//! array for an iterator.

use nebula_rules::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;

const BOOK: &str = r#"{
    "rules": {
        "customer": "required|alpha_num",
        "shipping": {
            "city": "required",
            "zip": "required|size:5"
        },
        "lines": [{
            "sku": "required|regex:/^[a-z]{2}-\\d+$/i",
            "qty": "to_int|min:1|max:#max_qty"
        }]
    },
    "labels": {"qty": "quantity"},
    "messages": {"sku.regex": "The :attribute ':value' is not a catalogue code."}
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let book = RuleBook::from_json_str(BOOK)?;
    let mut validator = book
        .to_validator()
        .with_config(std::sync::Arc::new(json!({"max_qty": 10})))
        .with_json(json!({
            "customer": "acme42",
            "shipping": {"city": "Riga", "zip": "LV10"},
            "lines": [
                {"sku": "AB-1", "qty": "3"},
                {"sku": "widget", "qty": "25"},
            ],
        }));

    let valid = validator.is_valid()?;
    println!("valid: {valid}");
    for path in validator.key_input_errors() {
        println!("   failing input: {path}");
    }
    println!("\n{:#}", validator.errors().to_json());
    Ok(())
}
