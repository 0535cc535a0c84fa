//! Signup Form Example
//!
//! Walks a small signup form through a sequence of input events, printing the
//! field state and the form verdict after each one.
//!
//! Run with:
//! ```bash
//! RUST_LOG=formrule=debug cargo run -p formrule --example signup_form
//! ```

use formrule::{FieldSchema, FormSchema, FormState, FormValidator, Transform, Value};
use regex::Regex;

fn build_schema() -> FormSchema {
    FormSchema::new()
        .field(
            "username",
            FieldSchema::new()
                .before_validation(|v| Value::String(v.as_text().trim().to_lowercase()))
                .rule_with_message("minLength", 3, "Pick a username of at least 3 characters.")
                .rule("matchRegex", Regex::new(r"^[a-z0-9_]+$").unwrap()),
        )
        .field("email", FieldSchema::new().rule("isEmail", true))
        .field(
            "plan",
            FieldSchema::new()
                .rule("enum", vec!["free", "pro", "team"])
                .default_value("free"),
        )
        .field(
            "referral",
            FieldSchema::new()
                .optional()
                .rule("exactLength", 8)
                // not a function: logged and ignored
                .transform(Transform::NotCallable(Value::from("uppercase please"))),
        )
}

fn print_state(event: &str, state: &FormState) {
    println!("after {}", event);
    for (name, field) in &state.fields {
        println!(
            "  {:<9} {:<7} {:<12} {}",
            name,
            field.status.to_string(),
            format!("{:?}", field.value.as_text()),
            field.error_text
        );
    }
    println!("  isFormOK = {}", state.is_form_ok);
    println!();
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let validator = FormValidator::new(build_schema());
    let mut state = validator.initial_state();
    print_state("initial render", &state);

    let events = [
        ("username", "  Al "),
        ("username", "  Alice_99 "),
        ("email", "alice@example"),
        ("email", "alice@example.com"),
        ("plan", "enterprise"),
        ("plan", "pro"),
        ("referral", "ABC"),
        ("referral", ""),
    ];

    for (field, raw) in events {
        match validator.validate(field, raw, &state).await {
            Ok(next) => {
                state = next;
                print_state(&format!("{} <- {:?}", field, raw), &state);
            }
            Err(e) => eprintln!("schema error: {}", e),
        }
    }
}
